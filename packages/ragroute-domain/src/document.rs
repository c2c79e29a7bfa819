use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::category::Category;

/// Metadata key marking the "no evidence found" sentinel.
pub const SENTINEL_METADATA_KEY: &str = "no_evidence";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	pub content: String,
	#[serde(default)]
	pub metadata: BTreeMap<String, String>,
}
impl Document {
	pub fn new(content: impl Into<String>) -> Self {
		Self { content: content.into(), metadata: BTreeMap::new() }
	}

	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata.insert(key.into(), value.into());

		self
	}

	/// Stand-in for an empty or failed retrieval. It keeps the evidence non-empty so the
	/// relevance grader still runs and can send the request down the irrelevant path.
	pub fn no_evidence(category: Category) -> Self {
		Self::new(category.no_evidence_message())
			.with_metadata(SENTINEL_METADATA_KEY, "true")
			.with_metadata("category", category.as_str())
	}

	pub fn is_sentinel(&self) -> bool {
		self.metadata.get(SENTINEL_METADATA_KEY).is_some_and(|value| value == "true")
	}
}

/// Renders evidence for the grader: each document's content cut to `max_chars` grapheme
/// clusters, documents separated by a blank line.
pub fn preview(documents: &[Document], max_chars: usize) -> String {
	documents
		.iter()
		.map(|doc| truncate_graphemes(&doc.content, max_chars))
		.collect::<Vec<_>>()
		.join("\n\n")
}

/// Renders evidence for generation, content plus metadata per document.
pub fn render_for_generation(documents: &[Document]) -> String {
	documents
		.iter()
		.map(|doc| {
			let metadata = doc
				.metadata
				.iter()
				.map(|(key, value)| format!("{key}={value}"))
				.collect::<Vec<_>>()
				.join(", ");

			format!("---\n본문: {}\n메타데이터: {{{metadata}}}\n---", doc.content)
		})
		.collect::<Vec<_>>()
		.join("\n\n")
}

fn truncate_graphemes(text: &str, max_chars: usize) -> &str {
	match text.grapheme_indices(true).nth(max_chars) {
		Some((end, _)) => &text[..end],
		None => text,
	}
}
