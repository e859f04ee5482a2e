use axum::{
	Form, Json,
	extract::{FromRequest, Query, Request, State},
	http::header::{AUTHORIZATION, CONTENT_TYPE},
	middleware::Next,
	response::{IntoResponse, Response},
};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::{
	routes::{ApiError, Envelope},
	state::AppState,
};

const BEARER_PREFIX: &str = "bearer ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenCheck {
	Valid,
	Missing,
	Invalid,
	/// The server holds no secret. Every token is refused.
	NotConfigured,
}
impl TokenCheck {
	pub fn message(self) -> &'static str {
		match self {
			Self::Valid => "ok",
			Self::Missing => "missing token",
			Self::Invalid => "invalid token",
			Self::NotConfigured => "server token not configured",
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct TokenPayload {
	#[serde(default)]
	token: String,
}

/// Trims the credential and drops a leading `Bearer ` in any letter case.
pub fn strip_bearer(raw: &str) -> &str {
	let trimmed = raw.trim();

	match trimmed.get(..BEARER_PREFIX.len()) {
		Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) =>
			trimmed[BEARER_PREFIX.len()..].trim(),
		_ => trimmed,
	}
}

pub fn check_token(expected: Option<&str>, presented: &str) -> TokenCheck {
	let Some(expected) = expected.filter(|value| !value.is_empty()) else {
		return TokenCheck::NotConfigured;
	};

	if presented.is_empty() {
		TokenCheck::Missing
	} else if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
		TokenCheck::Valid
	} else {
		TokenCheck::Invalid
	}
}

/// Guards protected routes with the `Authorization` header.
pub async fn require_token(
	State(state): State<AppState>,
	req: Request,
	next: Next,
) -> Response {
	let presented = req
		.headers()
		.get(AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.map(strip_bearer)
		.unwrap_or_default();
	let check = check_token(state.service.auth_token(), presented);

	if check != TokenCheck::Valid {
		tracing::warn!(path = %req.uri().path(), reason = check.message(), "Rejected request.");

		return ApiError::unauthorized(check.message()).into_response();
	}

	next.run(req).await
}

/// Pre-flight check for clients holding a token. Never guarded itself.
pub async fn verify_token(State(state): State<AppState>, req: Request) -> Response {
	let submitted = submitted_token(req).await;
	let check = check_token(state.service.auth_token(), strip_bearer(&submitted));

	match check {
		TokenCheck::Valid => Json(Envelope::<()>::message(0, check.message())).into_response(),
		_ => ApiError::unauthorized(check.message()).into_response(),
	}
}

/// Looks for `token` in a JSON body, then a form body, then the query string.
async fn submitted_token(req: Request) -> String {
	let from_query = Query::<TokenPayload>::try_from_uri(req.uri())
		.map(|Query(payload)| payload.token)
		.unwrap_or_default();
	let content_type = req
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_ascii_lowercase();
	let from_body = if content_type.starts_with("application/json") {
		Json::<TokenPayload>::from_request(req, &())
			.await
			.map(|Json(payload)| payload.token)
			.unwrap_or_default()
	} else if content_type.starts_with("application/x-www-form-urlencoded") {
		Form::<TokenPayload>::from_request(req, &())
			.await
			.map(|Form(payload)| payload.token)
			.unwrap_or_default()
	} else {
		String::new()
	};

	[from_body, from_query].into_iter().find(|token| !token.trim().is_empty()).unwrap_or_default()
}
