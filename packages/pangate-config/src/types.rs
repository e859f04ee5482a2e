use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub search: Search,
	pub engine: Engine,
	#[serde(default)]
	pub upstream: Upstream,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Channels searched when a request names none.
	pub default_channels: Vec<String>,
	/// Whether the plugin subsystem is enabled. When false, the health check does not disclose
	/// plugin inventory.
	pub plugins_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Engine {
	pub api_base: String,
	#[serde(default = "default_engine_path")]
	pub path: String,
	#[serde(default = "default_engine_timeout_ms")]
	pub timeout_ms: u64,
	/// Plugin names reported by the static plugin registry.
	#[serde(default)]
	pub plugins: Vec<String>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Upstream {
	pub catalog_base: String,
	pub timeout_ms: u64,
}
impl Default for Upstream {
	fn default() -> Self {
		Self { catalog_base: "https://movie.douban.com".to_string(), timeout_ms: 10_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	/// Environment variable holding the shared bearer secret. Overrides `api_auth_token`.
	pub auth_token_env: String,
	pub api_auth_token: Option<String>,
}
impl Default for Security {
	fn default() -> Self {
		Self { auth_token_env: "TOKEN".to_string(), api_auth_token: None }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_engine_path() -> String {
	"/api/search".to_string()
}

fn default_engine_timeout_ms() -> u64 {
	30_000
}
