//! Canonical search request model and the rules that normalize client input into it.

pub mod catalog;
pub mod normalize;
pub mod request;

mod error;

pub use catalog::{Category, SubjectFilter};
pub use error::{Error, Result};
pub use normalize::{ListParam, RawInput, normalize, parse_query};
pub use request::{RawSearchRequest, ResultType, SearchRequest, SourceType};
