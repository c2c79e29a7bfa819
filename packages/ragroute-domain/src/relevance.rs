use serde::Serialize;

/// Relevance grader output. Only the literal tokens `"1"` and `"0"` are accepted; any other
/// reply is [`RelevanceVerdict::Unparseable`], which scores like `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelevanceVerdict {
	Relevant,
	Irrelevant,
	Unparseable(String),
}
impl RelevanceVerdict {
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"1" => Self::Relevant,
			"0" => Self::Irrelevant,
			_ => Self::Unparseable(raw.to_string()),
		}
	}

	pub fn score(&self) -> RelevanceScore {
		match self {
			Self::Relevant => RelevanceScore::One,
			Self::Irrelevant | Self::Unparseable(_) => RelevanceScore::Zero,
		}
	}

	pub fn is_relevant(&self) -> bool {
		self.score() == RelevanceScore::One
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceScore {
	Zero,
	One,
}
impl RelevanceScore {
	pub fn as_u8(self) -> u8 {
		match self {
			Self::Zero => 0,
			Self::One => 1,
		}
	}
}

impl Serialize for RelevanceScore {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_u8(self.as_u8())
	}
}
