mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Engine, Search, Security, Service, Upstream};

use std::{env, fs, path::Path};

/// Reads, normalizes and validates the config file, then applies the auth token env override.
pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_env(&mut cfg, |key| env::var(key).ok());
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

/// Replaces `security.api_auth_token` with the value of `security.auth_token_env` when that
/// variable is set and non-blank.
pub fn apply_env<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	let key = cfg.security.auth_token_env.trim();

	if key.is_empty() {
		return;
	}
	if let Some(value) = lookup(key)
		&& !value.trim().is_empty()
	{
		cfg.security.api_auth_token = Some(value.trim().to_string());
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.engine.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "engine.api_base must be non-empty.".to_string(),
		});
	}
	if !cfg.engine.path.starts_with('/') {
		return Err(Error::Validation {
			message: "engine.path must start with '/'.".to_string(),
		});
	}
	if cfg.engine.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "engine.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.upstream.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "upstream.timeout_ms must be greater than zero.".to_string(),
		});
	}

	let catalog_base = cfg.upstream.catalog_base.as_str();

	if !(catalog_base.starts_with("http://") || catalog_base.starts_with("https://")) {
		return Err(Error::Validation {
			message: "upstream.catalog_base must be an http or https URL.".to_string(),
		});
	}

	for (key, value) in &cfg.engine.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("engine.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.search.default_channels.iter().any(|channel| channel.trim().is_empty()) {
		return Err(Error::Validation {
			message: "search.default_channels must not contain blank entries.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}

	cfg.upstream.catalog_base = cfg.upstream.catalog_base.trim().trim_end_matches('/').to_string();
	cfg.engine.api_base = cfg.engine.api_base.trim().trim_end_matches('/').to_string();
}
