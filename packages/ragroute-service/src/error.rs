use serde_json::{Map, Value};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Safety screening failed: {message}")]
	Safety { message: String },
	#[error("Generation failed: {message}")]
	Generation { message: String, details: Map<String, Value> },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl Error {
	/// Request context attached to the error, empty for kinds that carry none.
	pub fn details(&self) -> Map<String, Value> {
		match self {
			Self::Generation { details, .. } => details.clone(),
			Self::InvalidRequest { .. } | Self::Safety { .. } | Self::Provider { .. } => Map::new(),
		}
	}
}

impl From<ragroute_providers::Error> for Error {
	fn from(err: ragroute_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
