pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	InvalidRequest(#[from] pangate_domain::Error),
	#[error("Search failed: {message}")]
	Engine { message: String },
	#[error(transparent)]
	Upstream(#[from] pangate_providers::Error),
}
