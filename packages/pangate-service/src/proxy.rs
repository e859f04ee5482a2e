use std::collections::HashMap;

use bytes::Bytes;

use crate::{GatewayService, Result};
use pangate_providers::{
	catalog::CatalogQuery,
	image::{self, RelayedImage},
};

impl GatewayService {
	pub async fn forward_catalog(&self, params: &HashMap<String, String>) -> Result<Bytes> {
		let query = CatalogQuery::from_params(params);

		Ok(self.catalog.forward(&query).await?)
	}

	pub async fn relay_image(&self, params: &HashMap<String, String>) -> Result<RelayedImage> {
		let target = image::target_from_params(params)?;

		Ok(self.images.fetch(&target).await?)
	}
}
