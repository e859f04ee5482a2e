use std::collections::HashMap;

use serde_json::Map;

use crate::{Error, RawSearchRequest, Result, ResultType, SearchRequest, SourceType};

const DEFAULT_RESULT_TYPE: &str = ResultType::MERGE_ALIAS;
const DEFAULT_SOURCE_TYPE: &str = "all";
const EMPTY_EXT: &str = "{}";

/// Raw client input, tagged by the transport it arrived on.
#[derive(Debug, Clone, Copy)]
pub enum RawInput<'a> {
	Query(&'a HashMap<String, String>),
	Body(&'a [u8]),
}

/// A comma separated list parameter, keeping whether the key was sent at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListParam {
	Absent,
	/// The key was sent but carried no tokens.
	Blank,
	Values(Vec<String>),
}
impl ListParam {
	pub fn from_params(params: &HashMap<String, String>, key: &str) -> Self {
		let Some(raw) = params.get(key) else {
			return Self::Absent;
		};
		let values = split_list(raw);

		if values.is_empty() { Self::Blank } else { Self::Values(values) }
	}

	pub fn into_option(self) -> Option<Vec<String>> {
		match self {
			Self::Absent | Self::Blank => None,
			Self::Values(values) => Some(values),
		}
	}
}

/// Builds the canonical request from either transport and applies the shared defaulting rules.
pub fn normalize(input: RawInput<'_>, default_channels: &[String]) -> Result<SearchRequest> {
	let raw = match input {
		RawInput::Query(params) => parse_query(params)?,
		RawInput::Body(body) => parse_body(body)?,
	};

	canonicalize(raw, default_channels)
}

/// Reads the query-string parameters into the wire shape without applying the generic defaults.
pub fn parse_query(params: &HashMap<String, String>) -> Result<RawSearchRequest> {
	let concurrency =
		non_blank(params, "conc").and_then(|value| value.parse::<i32>().ok()).unwrap_or(0);
	let force_refresh = params.get("refresh").is_some_and(|value| value == "true");
	let result_type = non_blank(params, "res").unwrap_or(DEFAULT_RESULT_TYPE).to_string();
	let source_type = non_blank(params, "src").unwrap_or(DEFAULT_SOURCE_TYPE).to_string();

	Ok(RawSearchRequest {
		keyword: params.get("kw").cloned().unwrap_or_default(),
		channels: ListParam::from_params(params, "channels").into_option(),
		concurrency,
		force_refresh,
		result_type: Some(result_type),
		source_type: Some(source_type),
		plugins: ListParam::from_params(params, "plugins").into_option(),
		cloud_types: ListParam::from_params(params, "cloud_types").into_option(),
		ext: parse_ext(params.get("ext").map(String::as_str))?,
	})
}

fn parse_body(body: &[u8]) -> Result<RawSearchRequest> {
	serde_json::from_slice(body).map_err(|err| Error::InvalidBody { message: err.to_string() })
}

fn parse_ext(raw: Option<&str>) -> Result<Option<Map<String, serde_json::Value>>> {
	let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
		return Ok(None);
	};

	if raw == EMPTY_EXT {
		return Ok(Some(Map::new()));
	}

	// A JSON `null` decodes to `None`, same as an absent parameter.
	serde_json::from_str::<Option<Map<String, serde_json::Value>>>(raw)
		.map_err(|err| Error::InvalidExt { message: err.to_string() })
}

fn canonicalize(raw: RawSearchRequest, default_channels: &[String]) -> Result<SearchRequest> {
	let mut channels = raw.channels.filter(|channels| !channels.is_empty());

	if channels.is_none() && !default_channels.is_empty() {
		channels = Some(default_channels.to_vec());
	}

	let result_type = match raw.result_type.as_deref() {
		None | Some("") => ResultType::MergedByType,
		Some(value) => value.parse()?,
	};
	let source_type = match raw.source_type.as_deref() {
		None | Some("") => SourceType::All,
		Some(value) => SourceType::from(value),
	};
	let mut plugins = raw.plugins;

	match source_type {
		SourceType::Telegram => plugins = None,
		SourceType::Plugin => channels = None,
		SourceType::All => plugins = plugins.filter(|plugins| !plugins.is_empty()),
		SourceType::Other(_) => {},
	}

	Ok(SearchRequest {
		keyword: raw.keyword,
		channels,
		concurrency: raw.concurrency,
		force_refresh: raw.force_refresh,
		result_type,
		source_type,
		plugins,
		cloud_types: raw.cloud_types.filter(|cloud_types| !cloud_types.is_empty()),
		ext: raw.ext.unwrap_or_default(),
	})
}

fn non_blank<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
	params.get(key).map(|value| value.trim()).filter(|value| !value.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
	raw.split(',').map(str::trim).filter(|part| !part.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
	}

	#[test]
	fn list_param_tracks_key_presence() {
		let absent = params(&[]);
		let blank = params(&[("plugins", " , ,")]);
		let values = params(&[("plugins", " labi, ,zhizhen ")]);

		assert_eq!(ListParam::from_params(&absent, "plugins"), ListParam::Absent);
		assert_eq!(ListParam::from_params(&blank, "plugins"), ListParam::Blank);
		assert_eq!(
			ListParam::from_params(&values, "plugins"),
			ListParam::Values(vec!["labi".to_string(), "zhizhen".to_string()])
		);
		assert_eq!(ListParam::Blank.into_option(), None);
	}

	#[test]
	fn blank_query_values_use_literal_defaults() {
		let raw = parse_query(&params(&[("res", "  "), ("src", "")])).expect("parse failed");

		assert_eq!(raw.result_type.as_deref(), Some("merge"));
		assert_eq!(raw.source_type.as_deref(), Some("all"));
	}

	#[test]
	fn unparsable_concurrency_defaults_to_zero() {
		let raw = parse_query(&params(&[("conc", "ten")])).expect("parse failed");

		assert_eq!(raw.concurrency, 0);

		let raw = parse_query(&params(&[("conc", " 8 ")])).expect("parse failed");

		assert_eq!(raw.concurrency, 8);
	}

	#[test]
	fn refresh_requires_literal_true() {
		for (value, expected) in [("true", true), ("TRUE", false), ("1", false), ("", false)] {
			let raw = parse_query(&params(&[("refresh", value)])).expect("parse failed");

			assert_eq!(raw.force_refresh, expected, "refresh={value:?}");
		}
	}

	#[test]
	fn empty_ext_takes_fast_path() {
		assert_eq!(parse_ext(Some("{}")).expect("parse failed"), Some(Map::new()));
		assert_eq!(parse_ext(Some(" ")).expect("parse failed"), None);
		assert_eq!(parse_ext(None).expect("parse failed"), None);
	}

	#[test]
	fn null_ext_counts_as_absent() {
		assert_eq!(parse_ext(Some("null")).expect("parse failed"), None);
		assert!(parse_ext(Some("[1]")).is_err());
	}
}
