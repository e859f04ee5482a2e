pub mod health;
pub mod proxy;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use health::HealthReport;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use pangate_config::Config;
use pangate_domain::SearchRequest;
use pangate_providers::{catalog::CatalogClient, engine::HttpSearchEngine, image::ImageRelay};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The search execution engine. Ranking, caching and plugin execution all live behind it.
pub trait SearchEngine
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

pub trait PluginRegistry
where
	Self: Send + Sync,
{
	fn plugin_names(&self) -> Vec<String>;
}

/// Plugin inventory taken from `engine.plugins`.
#[derive(Debug, Clone, Default)]
pub struct StaticPluginRegistry {
	names: Vec<String>,
}
impl StaticPluginRegistry {
	pub fn new(names: Vec<String>) -> Self {
		Self { names }
	}
}

impl PluginRegistry for StaticPluginRegistry {
	fn plugin_names(&self) -> Vec<String> {
		self.names.clone()
	}
}

impl SearchEngine for HttpSearchEngine {
	fn search<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move { Ok(HttpSearchEngine::search(self, request).await?) })
	}
}

#[derive(Clone)]
pub struct Providers {
	pub engine: Arc<dyn SearchEngine>,
	pub plugins: Arc<dyn PluginRegistry>,
}
impl Providers {
	pub fn new(engine: Arc<dyn SearchEngine>, plugins: Arc<dyn PluginRegistry>) -> Self {
		Self { engine, plugins }
	}

	pub fn from_config(cfg: &Config) -> Result<Self> {
		let engine = HttpSearchEngine::new(&cfg.engine)?;
		let plugins = StaticPluginRegistry::new(cfg.engine.plugins.clone());

		Ok(Self::new(Arc::new(engine), Arc::new(plugins)))
	}
}

/// Everything a request handler needs. Built once at startup and shared read-only.
pub struct GatewayService {
	pub cfg: Config,
	pub providers: Providers,
	pub catalog: CatalogClient,
	pub images: ImageRelay,
}
impl GatewayService {
	pub fn new(cfg: Config) -> Result<Self> {
		let providers = Providers::from_config(&cfg)?;

		Self::with_providers(cfg, providers)
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		let client = pangate_providers::http_client(&cfg.upstream)?;
		let catalog = CatalogClient::new(client.clone(), cfg.upstream.catalog_base.clone());
		let images = ImageRelay::new(client);

		Ok(Self { cfg, providers, catalog, images })
	}

	/// Shared bearer secret, or `None` when the server has not been given one.
	pub fn auth_token(&self) -> Option<&str> {
		self.cfg.security.api_auth_token.as_deref()
	}
}
