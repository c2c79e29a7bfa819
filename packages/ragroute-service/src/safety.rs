use crate::{Error, RagService, Result};

impl RagService {
	/// Returns `true` when the question must be blocked. Blank questions are not screened.
	///
	/// The classifier is a hard dependency: a failed call is an error, never a pass.
	pub async fn screen(&self, question: &str) -> Result<bool> {
		if question.trim().is_empty() {
			return Ok(false);
		}

		self.providers
			.safety
			.screen(&self.cfg.providers.safety, question)
			.await
			.map_err(|err| Error::Safety { message: err.to_string() })
	}
}
