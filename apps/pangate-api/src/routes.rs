use std::{collections::HashMap, time::Instant};

use axum::{
	Json, Router,
	body::{self, Body},
	extract::{Query, Request, State},
	http::{
		StatusCode,
		header::{CACHE_CONTROL, CONTENT_TYPE},
	},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use crate::{auth, pages, state::AppState};
use pangate_domain::RawInput;
use pangate_providers::image;
use pangate_service::{Error as ServiceError, HealthReport};

/// Upper bound for a search request body.
const MAX_SEARCH_BODY_BYTES: usize = 1024 * 1024;
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub fn router(state: AppState) -> Router {
	let protected = Router::new()
		.route("/api/search", get(search_query).post(search_body))
		.route("/api/health", get(health))
		.route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

	Router::new()
		.route("/", get(pages::catalog))
		.route("/search", get(pages::search))
		.route("/token", get(pages::token))
		.route("/img", get(relay_image))
		.route("/api/douban", get(catalog))
		.route("/api/token/verify", post(auth::verify_token))
		.merge(protected)
		.layer(middleware::from_fn(log_requests))
		.with_state(state)
}

async fn search_query(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Value>>, ApiError> {
	let data = state.service.search(RawInput::Query(&params)).await?;

	Ok(Json(Envelope::success(data)))
}

async fn search_body(
	State(state): State<AppState>,
	body: Body,
) -> Result<Json<Envelope<Value>>, ApiError> {
	let bytes = body::to_bytes(body, MAX_SEARCH_BODY_BYTES).await.map_err(|err| {
		ApiError::from(pangate_domain::Error::UnreadableBody { message: err.to_string() })
	})?;
	let data = state.service.search(RawInput::Body(&bytes)).await?;

	Ok(Json(Envelope::success(data)))
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
	Json(state.service.health())
}

async fn catalog(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
	let body = state.service.forward_catalog(&params).await?;

	Ok(([(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response())
}

async fn relay_image(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	match state.service.relay_image(&params).await {
		Ok(relayed) => (
			[(CONTENT_TYPE, relayed.content_type), (CACHE_CONTROL, image::CACHE_CONTROL.to_string())],
			Body::from_stream(relayed.response.bytes_stream()),
		)
			.into_response(),
		Err(err) => ApiError::from(err).bare().into_response(),
	}
}

async fn log_requests(req: Request, next: Next) -> Response {
	let method = req.method().clone();
	let path = req.uri().path().to_string();
	let started = Instant::now();
	let response = next.run(req).await;

	tracing::info!(
		%method,
		%path,
		status = response.status().as_u16(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"Handled request."
	);

	response
}

/// Response envelope shared by the JSON API.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
	pub code: u16,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
}
impl<T> Envelope<T> {
	pub fn success(data: T) -> Self {
		Self { code: 0, message: "success".to_string(), data: Some(data) }
	}

	pub fn message(code: u16, message: impl Into<String>) -> Self {
		Self { code, message: message.into(), data: None }
	}
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
	bare: bool,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into(), bare: false }
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(StatusCode::UNAUTHORIZED, message)
	}

	/// Drops the JSON body; the status alone is sent.
	pub fn bare(self) -> Self {
		Self { bare: true, ..self }
	}
}

impl From<pangate_domain::Error> for ApiError {
	fn from(err: pangate_domain::Error) -> Self {
		Self::new(StatusCode::BAD_REQUEST, err.to_string())
	}
}

impl From<pangate_providers::Error> for ApiError {
	fn from(err: pangate_providers::Error) -> Self {
		use pangate_providers::Error;

		let status = match &err {
			Error::MissingTarget | Error::InvalidTarget { .. } => StatusCode::BAD_REQUEST,
			Error::ForbiddenTarget { .. } => StatusCode::FORBIDDEN,
			err if err.is_upstream() => StatusCode::BAD_GATEWAY,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		if status.is_server_error() {
			tracing::warn!(%status, error = %err, "Upstream call failed.");
		}

		Self::new(status, err.to_string())
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest(inner) => inner.into(),
			ServiceError::Upstream(inner) => inner.into(),
			engine @ ServiceError::Engine { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, engine.to_string()),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if self.bare {
			return self.status.into_response();
		}

		let body = Envelope::<()>::message(self.status.as_u16(), self.message);

		(self.status, Json(body)).into_response()
	}
}
