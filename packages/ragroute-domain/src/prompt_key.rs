use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Serialize, Serializer};

use crate::category::Category;

/// Selects the generation behavior. Independent of which category produced the evidence: a
/// category whose evidence graded irrelevant still generates with [`PromptKey::Fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKey {
	Category(Category),
	Fallback,
}
impl PromptKey {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Category(category) => category.as_str(),
			Self::Fallback => "fallback",
		}
	}

	pub fn is_fallback(self) -> bool {
		matches!(self, Self::Fallback)
	}
}

impl Display for PromptKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.as_str())
	}
}

impl Serialize for PromptKey {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
