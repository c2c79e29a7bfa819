use ragroute_domain::{Category, Document};

use crate::RagService;

impl RagService {
	/// Never returns an empty sequence: an empty or failed retrieval yields the category's
	/// no-evidence sentinel.
	pub async fn retrieve_evidence(&self, category: Category, query: &str) -> Vec<Document> {
		match self.providers.retrieval.retrieve(&self.cfg, category, query).await {
			Ok(documents) if !documents.is_empty() => documents,
			Ok(_) => {
				tracing::info!(%category, "Retrieval returned no documents.");

				vec![Document::no_evidence(category)]
			},
			Err(err) => {
				tracing::warn!(
					%category,
					error = %err,
					"Retrieval failed; treating as no evidence."
				);

				vec![Document::no_evidence(category)]
			},
		}
	}
}
