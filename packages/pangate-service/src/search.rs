use serde_json::Value;

use crate::{Error, GatewayService, Result};
use pangate_domain::{RawInput, SearchRequest};

impl GatewayService {
	pub fn normalize(&self, input: RawInput<'_>) -> Result<SearchRequest> {
		Ok(pangate_domain::normalize(input, &self.cfg.search.default_channels)?)
	}

	/// Normalizes the input and hands the canonical request to the engine. Invalid input never
	/// reaches the engine.
	pub async fn search(&self, input: RawInput<'_>) -> Result<Value> {
		let request = self.normalize(input)?;

		tracing::debug!(
			keyword = %request.keyword,
			channels = ?request.channels,
			concurrency = request.concurrency,
			refresh = request.force_refresh,
			result_type = %request.result_type,
			source_type = %request.source_type,
			plugins = ?request.plugins,
			cloud_types = ?request.cloud_types,
			"Dispatching search."
		);

		self.providers.engine.search(&request).await.map_err(|err| {
			tracing::warn!(error = %err, "Search engine failed.");

			Error::Engine { message: err.to_string() }
		})
	}
}
