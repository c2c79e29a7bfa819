use serde_json::Value;

use crate::{Result, chat, prompts};
use ragroute_config::LlmProviderConfig;

const MAX_ATTEMPTS: usize = 3;

/// Asks the LLM to pick a retrieval tool and returns its label. `visited` carries the tool
/// names already tried; when non-empty the re-route instruction is added.
///
/// Replies that are not a `{"tool": ...}` object are retried; after the last attempt the raw
/// reply is returned for the caller to classify.
pub async fn route(cfg: &LlmProviderConfig, question: &str, visited: &[&str]) -> Result<String> {
	let system = if visited.is_empty() {
		prompts::ROUTE_SYSTEM.to_string()
	} else {
		format!("{}{}", prompts::reroute_hint(visited), prompts::ROUTE_SYSTEM)
	};
	let messages = [chat::message("system", system), chat::message("user", question)];
	let mut last = String::new();

	for _ in 0..MAX_ATTEMPTS {
		let content = chat::complete_json(cfg, &messages).await?;

		if let Some(tool) = parse_tool(&content) {
			return Ok(tool);
		}

		last = content;
	}

	Ok(last)
}

fn parse_tool(content: &str) -> Option<String> {
	let json: Value = serde_json::from_str(content.trim()).ok()?;

	json.get("tool").and_then(Value::as_str).map(ToString::to_string)
}
