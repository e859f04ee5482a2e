//! Forwarding of subject search and suggestion calls to the movie catalog.

use std::collections::HashMap;

use bytes::Bytes;
use reqwest::{Client, StatusCode};

use crate::{Error, Result};
use pangate_domain::SubjectFilter;

pub const SUGGEST_PATH: &str = "/j/subject_suggest";
pub const SEARCH_SUBJECTS_PATH: &str = "/j/search_subjects";
pub const JSON_ACCEPT: &str = "application/json, text/plain, */*";

const DEFAULT_PAGE_LIMIT: &str = "20";
const DEFAULT_PAGE_START: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
	Suggest {
		q: Option<String>,
	},
	Subjects {
		filter: SubjectFilter,
		search_text: Option<String>,
		page_limit: String,
		page_start: String,
	},
}
impl CatalogQuery {
	/// Suggestion mode is selected by `suggest=1` or `endpoint=suggest`; anything else is a
	/// subject search.
	pub fn from_params(params: &HashMap<String, String>) -> Self {
		let get = |key: &str| params.get(key).map(String::as_str);
		let non_empty = |key: &str| get(key).filter(|value| !value.is_empty()).map(str::to_string);

		if get("suggest") == Some("1") || get("endpoint") == Some("suggest") {
			return Self::Suggest { q: non_empty("q") };
		}

		Self::Subjects {
			filter: SubjectFilter::resolve(get("type"), get("tag"), get("cat")),
			search_text: non_empty("search_text"),
			page_limit: get("page_limit").unwrap_or(DEFAULT_PAGE_LIMIT).to_string(),
			page_start: get("page_start").unwrap_or(DEFAULT_PAGE_START).to_string(),
		}
	}

	pub fn path(&self) -> &'static str {
		match self {
			Self::Suggest { .. } => SUGGEST_PATH,
			Self::Subjects { .. } => SEARCH_SUBJECTS_PATH,
		}
	}

	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		match self {
			Self::Suggest { q } =>
				if let Some(q) = q {
					pairs.push(("q", q.clone()));
				},
			Self::Subjects { filter, search_text, page_limit, page_start } => {
				if let Some(kind) = &filter.kind {
					pairs.push(("type", kind.clone()));
				}
				if let Some(tag) = &filter.tag {
					pairs.push(("tag", tag.clone()));
				}
				if let Some(search_text) = search_text {
					pairs.push(("search_text", search_text.clone()));
				}

				pairs.push(("page_limit", page_limit.clone()));
				pairs.push(("page_start", page_start.clone()));
			},
		}

		pairs
	}
}

/// Client for the catalog's JSON endpoints. Bodies are returned untouched.
#[derive(Clone)]
pub struct CatalogClient {
	client: Client,
	base_url: String,
}
impl CatalogClient {
	pub fn new(client: Client, base_url: impl Into<String>) -> Self {
		Self { client, base_url: base_url.into() }
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub async fn forward(&self, query: &CatalogQuery) -> Result<Bytes> {
		let url = format!("{}{}", self.base_url, query.path());
		let response = self
			.client
			.get(url)
			.headers(crate::browser_headers(JSON_ACCEPT))
			.query(&query.query_pairs())
			.send()
			.await
			.map_err(Error::from_send)?;
		let status = response.status();

		if status != StatusCode::OK {
			tracing::warn!(%status, path = query.path(), "Catalog responded with non-OK status.");

			return Err(Error::Status { status: status.to_string() });
		}

		response.bytes().await.map_err(Error::ReadBody)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
	}

	#[test]
	fn suggest_mode_forwards_only_q() {
		let query = CatalogQuery::from_params(&params(&[("endpoint", "suggest"), ("q", "dune")]));

		assert_eq!(query.path(), SUGGEST_PATH);
		assert_eq!(query.query_pairs(), vec![("q", "dune".to_string())]);

		let query = CatalogQuery::from_params(&params(&[("suggest", "1"), ("q", "")]));

		assert!(query.query_pairs().is_empty());
	}

	#[test]
	fn category_shortcut_fills_type_and_tag() {
		let query = CatalogQuery::from_params(&params(&[("cat", "tv")]));

		assert_eq!(query.path(), SEARCH_SUBJECTS_PATH);
		assert_eq!(query.query_pairs(), vec![
			("type", "tv".to_string()),
			("tag", "热门".to_string()),
			("page_limit", "20".to_string()),
			("page_start", "0".to_string()),
		]);
	}

	#[test]
	fn explicit_type_and_tag_override_category() {
		let query = CatalogQuery::from_params(&params(&[
			("cat", "tv"),
			("type", "movie"),
			("tag", "文艺"),
			("page_limit", "50"),
			("page_start", "100"),
			("search_text", "nolan"),
		]));

		assert_eq!(query.query_pairs(), vec![
			("type", "movie".to_string()),
			("tag", "文艺".to_string()),
			("search_text", "nolan".to_string()),
			("page_limit", "50".to_string()),
			("page_start", "100".to_string()),
		]);
	}

	#[test]
	fn page_defaults_only_apply_to_absent_keys() {
		let query = CatalogQuery::from_params(&params(&[("page_limit", "")]));
		let pairs = query.query_pairs();

		assert!(pairs.contains(&("page_limit", String::new())));
		assert!(pairs.contains(&("page_start", "0".to_string())));
	}
}
