use crate::category::{Category, FALLBACK_LABEL};

/// Router output after parsing. Anything outside the catalog and the fallback label is kept
/// as [`RouteDecision::Unparseable`] so callers can log it before treating it as fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
	Category(Category),
	Fallback,
	Unparseable(String),
}
impl RouteDecision {
	/// Parses either a bare label (`search_policy`, `policy`, `llm_fallback`) or a JSON object
	/// of the form `{"tool": "<label>"}`, optionally wrapped in a Markdown code fence.
	pub fn parse(raw: &str) -> Self {
		let label = extract_tool_label(raw).unwrap_or_else(|| raw.trim().to_string());

		if label.eq_ignore_ascii_case(FALLBACK_LABEL) || label.eq_ignore_ascii_case("fallback") {
			return Self::Fallback;
		}

		match Category::from_label(&label) {
			Some(category) => Self::Category(category),
			None => Self::Unparseable(raw.to_string()),
		}
	}
}

fn extract_tool_label(raw: &str) -> Option<String> {
	let trimmed = strip_code_fence(raw.trim());

	if !trimmed.starts_with('{') {
		return None;
	}

	let key_at = trimmed.find("\"tool\"")?;
	let after_key = &trimmed[key_at + "\"tool\"".len()..];
	let after_colon = after_key.trim_start().strip_prefix(':')?.trim_start();
	let value = after_colon.strip_prefix('"')?;
	let end = value.find('"')?;

	Some(value[..end].trim().to_string())
}

fn strip_code_fence(text: &str) -> &str {
	let Some(body) = text.strip_prefix("```") else {
		return text;
	};
	let body = body.trim_start_matches(|c: char| c.is_ascii_alphabetic());

	body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_tool_from_json_object() {
		assert_eq!(
			RouteDecision::parse("{\"tool\": \"search_admission\"}"),
			RouteDecision::Category(Category::Admission)
		);
		assert_eq!(
			RouteDecision::parse("```json\n{ \"tool\" : \"llm_fallback\" }\n```"),
			RouteDecision::Fallback
		);
	}

	#[test]
	fn keeps_out_of_catalog_output_verbatim() {
		assert_eq!(
			RouteDecision::parse("search_service"),
			RouteDecision::Unparseable("search_service".to_string())
		);
	}
}
