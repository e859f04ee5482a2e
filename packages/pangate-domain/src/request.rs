use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Wire shape accepted on the body transport. Every field is optional; defaults are applied by
/// [`crate::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSearchRequest {
	#[serde(default, rename = "kw")]
	pub keyword: String,
	#[serde(default)]
	pub channels: Option<Vec<String>>,
	#[serde(default, rename = "conc")]
	pub concurrency: i32,
	#[serde(default, rename = "refresh")]
	pub force_refresh: bool,
	#[serde(default, rename = "res")]
	pub result_type: Option<String>,
	#[serde(default, rename = "src")]
	pub source_type: Option<String>,
	#[serde(default)]
	pub plugins: Option<Vec<String>>,
	#[serde(default)]
	pub cloud_types: Option<Vec<String>>,
	#[serde(default)]
	pub ext: Option<Map<String, Value>>,
}

/// Canonical request handed to the search engine.
///
/// `None` list fields mean "unspecified"; the engine applies its own defaults for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
	#[serde(rename = "kw")]
	pub keyword: String,
	pub channels: Option<Vec<String>>,
	#[serde(rename = "conc")]
	pub concurrency: i32,
	#[serde(rename = "refresh")]
	pub force_refresh: bool,
	#[serde(rename = "res")]
	pub result_type: ResultType,
	#[serde(rename = "src")]
	pub source_type: SourceType,
	pub plugins: Option<Vec<String>>,
	pub cloud_types: Option<Vec<String>>,
	pub ext: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
	#[default]
	MergedByType,
	All,
	Results,
}
impl ResultType {
	/// Client-facing alias for [`ResultType::MergedByType`].
	pub const MERGE_ALIAS: &'static str = "merge";

	pub fn as_str(self) -> &'static str {
		match self {
			Self::MergedByType => "merged_by_type",
			Self::All => "all",
			Self::Results => "results",
		}
	}
}
impl FromStr for ResultType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"merged_by_type" | Self::MERGE_ALIAS => Ok(Self::MergedByType),
			"all" => Ok(Self::All),
			"results" => Ok(Self::Results),
			other => Err(Error::InvalidResultType { value: other.to_string() }),
		}
	}
}
impl fmt::Display for ResultType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Data source mode. Unknown values are kept verbatim and left for the engine to judge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum SourceType {
	Telegram,
	Plugin,
	#[default]
	All,
	Other(String),
}
impl SourceType {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Telegram => "tg",
			Self::Plugin => "plugin",
			Self::All => "all",
			Self::Other(value) => value,
		}
	}
}
impl From<&str> for SourceType {
	fn from(value: &str) -> Self {
		match value {
			"tg" => Self::Telegram,
			"plugin" => Self::Plugin,
			"all" => Self::All,
			other => Self::Other(other.to_string()),
		}
	}
}
impl From<SourceType> for String {
	fn from(value: SourceType) -> Self {
		match value {
			SourceType::Other(value) => value,
			known => known.as_str().to_string(),
		}
	}
}
impl fmt::Display for SourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
