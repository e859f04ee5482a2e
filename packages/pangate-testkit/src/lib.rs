mod error;

pub use error::{Error, Result};

use std::{
	net::SocketAddr,
	sync::{Arc, Mutex},
};

use axum::Router;
use color_eyre::eyre;
use serde_json::{Map, Value};
use tokio::{net::TcpListener, task::JoinHandle};

use pangate_config::{Config, Engine, Search, Security, Service, Upstream};
use pangate_domain::SearchRequest;
use pangate_service::{BoxFuture, PluginRegistry, Providers, SearchEngine};

pub const TEST_TOKEN: &str = "secret1";

/// Config with two default channels, plugins enabled and `TEST_TOKEN` as the shared secret.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		search: Search {
			default_channels: vec!["tgsearchers3".to_string(), "Aliyun_4K_Movies".to_string()],
			plugins_enabled: true,
		},
		engine: Engine {
			api_base: "http://127.0.0.1:1".to_string(),
			path: "/api/search".to_string(),
			timeout_ms: 1_000,
			plugins: Vec::new(),
			default_headers: Map::new(),
		},
		upstream: Upstream { catalog_base: "http://127.0.0.1:1".to_string(), timeout_ms: 2_000 },
		security: Security {
			auth_token_env: "PANGATE_TEST_TOKEN".to_string(),
			api_auth_token: Some(TEST_TOKEN.to_string()),
		},
	}
}

enum Outcome {
	Ok(Value),
	Fail(String),
}

/// Engine double that records every canonical request it receives.
pub struct StubEngine {
	outcome: Outcome,
	calls: Mutex<Vec<SearchRequest>>,
}
impl StubEngine {
	pub fn returning(value: Value) -> Arc<Self> {
		Arc::new(Self { outcome: Outcome::Ok(value), calls: Mutex::new(Vec::new()) })
	}

	pub fn failing(message: &str) -> Arc<Self> {
		Arc::new(Self { outcome: Outcome::Fail(message.to_string()), calls: Mutex::new(Vec::new()) })
	}

	pub fn calls(&self) -> Vec<SearchRequest> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn last_call(&self) -> Option<SearchRequest> {
		self.calls().pop()
	}
}

impl SearchEngine for StubEngine {
	fn search<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).push(request.clone());

		let result = match &self.outcome {
			Outcome::Ok(value) => Ok(value.clone()),
			Outcome::Fail(message) => Err(eyre::eyre!("{message}")),
		};

		Box::pin(async move { result })
	}
}

pub struct StubPlugins(pub Vec<String>);

impl PluginRegistry for StubPlugins {
	fn plugin_names(&self) -> Vec<String> {
		self.0.clone()
	}
}

pub fn stub_providers(engine: Arc<StubEngine>, plugins: &[&str]) -> Providers {
	let plugins = StubPlugins(plugins.iter().map(|name| name.to_string()).collect());

	Providers::new(engine, Arc::new(plugins))
}

/// A local HTTP server standing in for an upstream host. Aborted on drop.
pub struct UpstreamServer {
	addr: SocketAddr,
	handle: JoinHandle<()>,
}
impl UpstreamServer {
	pub async fn spawn(router: Router) -> Result<Self> {
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router).await {
				eprintln!("Upstream test server stopped: {err}.");
			}
		});

		Ok(Self { addr, handle })
	}

	pub fn addr(&self) -> SocketAddr {
		self.addr
	}

	pub fn base_url(&self) -> String {
		format!("http://{}", self.addr)
	}

	/// Client that sends every request for `host` to this server, keeping the URL's host intact.
	pub fn resolving_client(&self, host: &str) -> Result<reqwest::Client> {
		Ok(reqwest::Client::builder().resolve(host, self.addr).build()?)
	}
}
impl Drop for UpstreamServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}
