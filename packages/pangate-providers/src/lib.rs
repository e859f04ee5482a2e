pub mod catalog;
pub mod engine;
pub mod image;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT},
};
use serde_json::{Map, Value};

/// Desktop browser identity presented to the catalog provider and its image hosts.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0 Safari/537.36";
pub const PROVIDER_REFERER: &str = "https://movie.douban.com/";

/// Builds the pooled client shared by the catalog proxy and the image relay.
pub fn http_client(cfg: &pangate_config::Upstream) -> Result<Client> {
	Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build().map_err(Error::Request)
}

/// Headers that make an outbound call look like it came from the provider's own site.
pub fn browser_headers(accept: &'static str) -> HeaderMap {
	let mut headers = HeaderMap::new();

	headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
	headers.insert(ACCEPT, HeaderValue::from_static(accept));
	headers.insert(REFERER, HeaderValue::from_static(PROVIDER_REFERER));

	headers
}

pub fn default_headers(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
