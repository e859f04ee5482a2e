pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to build upstream request: {0}")]
	Request(#[source] reqwest::Error),
	#[error("Upstream request failed: {0}")]
	Transport(#[source] reqwest::Error),
	#[error("Upstream responded with unexpected status: {status}")]
	Status { status: String },
	#[error("Failed to read upstream response: {0}")]
	ReadBody(#[source] reqwest::Error),
	#[error("Missing proxy target.")]
	MissingTarget,
	#[error("Invalid proxy target: {message}")]
	InvalidTarget { message: String },
	#[error("Proxy target is not allowlisted: {target}")]
	ForbiddenTarget { target: String },
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
}
impl Error {
	/// Classifies a `send` failure: builder errors are ours, everything else is the upstream's.
	pub(crate) fn from_send(err: reqwest::Error) -> Self {
		if err.is_builder() { Self::Request(err) } else { Self::Transport(err) }
	}

	/// Whether the failure happened on the upstream side of the exchange.
	pub fn is_upstream(&self) -> bool {
		matches!(self, Self::Transport(_) | Self::Status { .. } | Self::ReadBody(_))
	}
}
