pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Client input failures raised while building a canonical search request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid ext parameter: {message}")]
	InvalidExt { message: String },
	#[error("Failed to read request body: {message}")]
	UnreadableBody { message: String },
	#[error("Invalid request parameters: {message}")]
	InvalidBody { message: String },
	#[error("Invalid res parameter: {value}")]
	InvalidResultType { value: String },
}
