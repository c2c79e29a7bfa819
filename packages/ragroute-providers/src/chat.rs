use serde_json::Value;

use crate::{Error, Result};
use ragroute_config::LlmProviderConfig;

/// Sends one chat-completions request and returns the first choice's message content.
pub async fn complete(cfg: &LlmProviderConfig, messages: &[Value]) -> Result<String> {
	complete_with(cfg, messages, None).await
}

/// Same as [`complete`] but asks the provider for a JSON object reply.
pub async fn complete_json(cfg: &LlmProviderConfig, messages: &[Value]) -> Result<String> {
	complete_with(cfg, messages, Some(serde_json::json!({ "type": "json_object" }))).await
}

pub(crate) fn message(role: &str, content: impl Into<String>) -> Value {
	serde_json::json!({ "role": role, "content": content.into() })
}

async fn complete_with(
	cfg: &LlmProviderConfig,
	messages: &[Value],
	response_format: Option<Value>,
) -> Result<String> {
	let client = crate::client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});

	if let Some(format) = response_format {
		body["response_format"] = format;
	}

	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_chat_content(json)
}

fn parse_chat_content(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(ToString::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Chat response is missing choices[0].message.content.".to_string(),
		})
}
