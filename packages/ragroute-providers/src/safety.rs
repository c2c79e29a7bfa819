use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};
use ragroute_config::SafetyProviderConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
	pub label: String,
	pub score: f32,
}

/// Returns whether `text` should be blocked.
pub async fn screen(cfg: &SafetyProviderConfig, text: &str) -> Result<bool> {
	let scores = classify(cfg, text).await?;

	Ok(is_blocked(cfg, &scores))
}

pub async fn classify(cfg: &SafetyProviderConfig, text: &str) -> Result<Vec<LabelScore>> {
	let client = crate::client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "inputs": text });
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_label_scores(json)
}

/// Blocks when the abuse label is confidently present or the clean label is confidently
/// absent. A missing abuse label scores 0 and a missing clean label scores 1.
pub fn is_blocked(cfg: &SafetyProviderConfig, scores: &[LabelScore]) -> bool {
	let score_of = |label: &str| scores.iter().find(|s| s.label == label).map(|s| s.score);
	let abuse = score_of(&cfg.abuse_label).unwrap_or(0.0);
	let clean = score_of(&cfg.clean_label).unwrap_or(1.0);

	abuse > cfg.abuse_threshold || clean < cfg.clean_min_score
}

/// Accepts `[[{label, score}]]` (one list per input), `[{label, score}]`, or
/// `{"labels": [{label, score}]}`.
fn parse_label_scores(json: Value) -> Result<Vec<LabelScore>> {
	let list = match json {
		Value::Array(mut items) if items.first().is_some_and(Value::is_array) =>
			items.swap_remove(0),
		Value::Object(mut map) => map.remove("labels").ok_or_else(|| Error::InvalidResponse {
			message: "Safety response is missing labels.".to_string(),
		})?,
		other => other,
	};

	Ok(serde_json::from_value(list)?)
}
