use std::sync::Arc;

use pangate_service::GatewayService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<GatewayService>,
}
impl AppState {
	pub fn new(config: pangate_config::Config) -> color_eyre::Result<Self> {
		let service = GatewayService::new(config)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: GatewayService) -> Self {
		Self { service: Arc::new(service) }
	}
}
