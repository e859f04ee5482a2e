//! Relay for catalog images, restricted to the provider's own hosts.

use std::collections::HashMap;

use reqwest::{Client, Response, StatusCode, Url, header::CONTENT_TYPE};

use crate::{Error, Result};

/// Registrable domains the relay may fetch from. Subdomains of each entry are allowed too.
pub const ALLOWED_DOMAINS: [&str; 2] = ["douban.com", "doubanio.com"];
pub const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";
pub const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";
pub const CACHE_CONTROL: &str = "public, max-age=86400";

/// Upstream image response whose body has not been read yet.
#[derive(Debug)]
pub struct RelayedImage {
	pub content_type: String,
	pub response: Response,
}

#[derive(Clone)]
pub struct ImageRelay {
	client: Client,
}
impl ImageRelay {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	pub async fn fetch(&self, target: &Url) -> Result<RelayedImage> {
		let response = self
			.client
			.get(target.clone())
			.headers(crate::browser_headers(IMAGE_ACCEPT))
			.send()
			.await
			.map_err(Error::from_send)?;
		let status = response.status();

		if status != StatusCode::OK {
			tracing::warn!(
				%status,
				host = target.host_str(),
				"Image host responded with non-OK status."
			);

			return Err(Error::Status { status: status.to_string() });
		}

		let header = response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok());
		let content_type = infer_content_type(header, target);

		Ok(RelayedImage { content_type, response })
	}
}

/// Reads the target from `u`, falling back to `url`, and checks it against the allowlist.
pub fn target_from_params(params: &HashMap<String, String>) -> Result<Url> {
	let raw = ["u", "url"]
		.into_iter()
		.filter_map(|key| params.get(key))
		.find(|value| !value.is_empty())
		.ok_or(Error::MissingTarget)?;

	validate_target(raw)
}

pub fn validate_target(raw: &str) -> Result<Url> {
	let url = Url::parse(raw).map_err(|err| Error::InvalidTarget { message: err.to_string() })?;
	let forbidden = || Error::ForbiddenTarget { target: url.to_string() };

	if !matches!(url.scheme(), "http" | "https") {
		return Err(forbidden());
	}
	// `port()` is `None` for the scheme's default port.
	if url.port().is_some() {
		return Err(forbidden());
	}

	if !url.host_str().is_some_and(is_allowed_host) {
		return Err(forbidden());
	}

	Ok(url)
}

pub fn is_allowed_host(host: &str) -> bool {
	let host = host.to_ascii_lowercase();

	ALLOWED_DOMAINS.iter().any(|domain| {
		host == *domain
			|| host
				.strip_suffix(domain)
				.is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
	})
}

/// Prefers the upstream header, then the path extension, then JPEG.
pub fn infer_content_type(header: Option<&str>, target: &Url) -> String {
	if let Some(header) = header.map(str::trim).filter(|value| !value.is_empty()) {
		return header.to_string();
	}

	mime_guess::from_path(target.path())
		.first()
		.map(|mime| mime.to_string())
		.unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
