use ragroute_domain::{Document, RelevanceVerdict, document};

use crate::RagService;

impl RagService {
	/// Grades whether `evidence` can answer `question`. Fails closed: a failed call grades as
	/// irrelevant, and anything but the literal `"1"`/`"0"` is kept as
	/// [`RelevanceVerdict::Unparseable`], which scores as irrelevant.
	pub async fn grade_evidence(&self, question: &str, evidence: &[Document]) -> RelevanceVerdict {
		let preview = document::preview(evidence, self.cfg.relevance.preview_chars);

		match self.providers.grader.grade(&self.cfg.providers.llm, question, &preview).await {
			Ok(raw) => {
				let verdict = RelevanceVerdict::parse(&raw);

				if let RelevanceVerdict::Unparseable(raw) = &verdict {
					tracing::warn!(raw = %raw, "Unexpected grader output; grading as irrelevant.");
				}

				verdict
			},
			Err(err) => {
				tracing::warn!(error = %err, "Relevance grading failed; grading as irrelevant.");

				RelevanceVerdict::Irrelevant
			},
		}
	}
}
