use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Label the router uses for "no retrieval category fits".
pub const FALLBACK_LABEL: &str = "llm_fallback";

/// Retrieval categories in routing-prompt order.
pub const CATALOG: [Category; 5] =
	[Category::Policy, Category::Subject, Category::Admission, Category::Book, Category::Seteuk];

/// One retrieval domain. The fallback sentinel is not a category; see
/// [`crate::RouteDecision::Fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	/// High school credit system operation: graduation, completion standards, registration.
	Policy,
	/// A particular high school subject: content, selection, grading.
	Subject,
	/// University admissions, departments and majors.
	Admission,
	/// Book recommendations for majors and interests.
	Book,
	/// 세특 (detailed ability notes) topic and activity suggestions.
	Seteuk,
}
impl Category {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Policy => "policy",
			Self::Subject => "subject",
			Self::Admission => "admission",
			Self::Book => "book",
			Self::Seteuk => "seteuk",
		}
	}

	/// Name of the retrieval tool the router is asked to pick.
	pub fn tool_name(self) -> &'static str {
		match self {
			Self::Policy => "search_policy",
			Self::Subject => "search_subject",
			Self::Admission => "search_admission",
			Self::Book => "search_book",
			Self::Seteuk => "search_seteuk",
		}
	}

	/// Accepts both the bare category name and the tool name, ignoring case and surrounding
	/// whitespace.
	pub fn from_label(label: &str) -> Option<Self> {
		let normalized = label.trim().to_ascii_lowercase();
		let name = normalized.strip_prefix("search_").unwrap_or(&normalized);

		CATALOG.into_iter().find(|category| category.as_str() == name)
	}

	/// Content of the sentinel document returned when retrieval finds nothing.
	pub fn no_evidence_message(self) -> &'static str {
		match self {
			Self::Policy => "관련 고교학점제 운영 정보를 찾을 수 없습니다.",
			Self::Subject => "관련 과목 정보를 찾을 수 없습니다.",
			Self::Admission => "관련 입시 정보를 찾을 수 없습니다.",
			Self::Book => "관련 도서 정보를 찾을 수 없습니다.",
			Self::Seteuk => "관련 세특 정보를 찾을 수 없습니다.",
		}
	}
}

impl Display for Category {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.as_str())
	}
}
