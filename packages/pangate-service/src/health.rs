use serde::Serialize;

use crate::GatewayService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
	pub status: &'static str,
	pub plugins_enabled: bool,
	pub channels: Vec<String>,
	pub channels_count: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub plugin_count: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub plugins: Option<Vec<String>>,
}

impl GatewayService {
	/// Plugin inventory is only disclosed while the plugin subsystem is enabled.
	pub fn health(&self) -> HealthReport {
		let channels = self.cfg.search.default_channels.clone();
		let plugins = self
			.cfg
			.search
			.plugins_enabled
			.then(|| self.providers.plugins.plugin_names());

		HealthReport {
			status: "ok",
			plugins_enabled: self.cfg.search.plugins_enabled,
			channels_count: channels.len(),
			channels,
			plugin_count: plugins.as_ref().map(Vec::len),
			plugins,
		}
	}
}
