use crate::RagService;

impl RagService {
	/// Folds the user's recent exchanges into `question` so it reads on its own.
	///
	/// Always reads the session as it is now, not a snapshot taken earlier in the request. A
	/// failed or empty rewrite yields `question` unchanged.
	pub async fn rewrite_query(&self, user_id: &str, question: &str) -> String {
		let history =
			self.sessions.recent_history_text(user_id, self.cfg.session.rewrite_history_turns);

		match self.providers.rewrite.rewrite(&self.cfg.providers.llm, &history, question).await {
			Ok(rewritten) if !rewritten.trim().is_empty() => rewritten.trim().to_string(),
			Ok(_) => {
				tracing::warn!(
					user_id,
					"Query rewrite returned empty text; using original question."
				);

				question.to_string()
			},
			Err(err) => {
				tracing::warn!(
					user_id,
					error = %err,
					"Query rewrite failed; falling back to original question."
				);

				question.to_string()
			},
		}
	}
}
