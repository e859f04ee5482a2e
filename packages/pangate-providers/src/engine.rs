use std::time::Duration;

use reqwest::{Client, header::HeaderMap};
use serde_json::Value;

use crate::{Error, Result};
use pangate_domain::SearchRequest;

/// Search engine reached over HTTP. The canonical request is posted as JSON.
#[derive(Clone)]
pub struct HttpSearchEngine {
	client: Client,
	url: String,
	headers: HeaderMap,
}
impl HttpSearchEngine {
	pub fn new(cfg: &pangate_config::Engine) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.build()
			.map_err(Error::Request)?;

		Ok(Self {
			client,
			url: format!("{}{}", cfg.api_base, cfg.path),
			headers: crate::default_headers(&cfg.default_headers)?,
		})
	}

	pub async fn search(&self, request: &SearchRequest) -> Result<Value> {
		let response = self
			.client
			.post(&self.url)
			.headers(self.headers.clone())
			.json(request)
			.send()
			.await
			.map_err(Error::from_send)?;
		let status = response.status();

		if !status.is_success() {
			return Err(Error::Status { status: status.to_string() });
		}

		let json: Value = response.json().await.map_err(Error::ReadBody)?;

		Ok(unwrap_envelope(json))
	}
}

/// Engines answering with a `{code, message, data}` envelope are unwrapped to `data`.
fn unwrap_envelope(json: Value) -> Value {
	match json {
		Value::Object(mut map) if map.contains_key("code") && map.contains_key("data") =>
			map.remove("data").unwrap_or(Value::Null),
		other => other,
	}
}
