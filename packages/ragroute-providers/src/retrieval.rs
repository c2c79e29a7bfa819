use std::collections::BTreeMap;

use serde_json::Value;

use crate::{Error, Result, rerank};
use ragroute_config::{CategoryRetrieval, ProviderConfig};

/// One search back-end match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
	pub content: String,
	pub metadata: BTreeMap<String, String>,
}

/// Fetches `candidate_k` matches from the category's namespace, reranks them, and keeps the
/// best `top_n`.
pub async fn retrieve(
	search_cfg: &ProviderConfig,
	rerank_cfg: &ProviderConfig,
	retrieval: &CategoryRetrieval,
	query: &str,
) -> Result<Vec<SearchHit>> {
	let hits = search(search_cfg, &retrieval.namespace, query, retrieval.candidate_k).await?;

	if hits.len() <= 1 {
		return Ok(hits);
	}

	let texts: Vec<String> = hits.iter().map(|hit| hit.content.clone()).collect();
	let scores = rerank::rerank(rerank_cfg, query, &texts).await?;

	Ok(keep_top(hits, &scores, retrieval.top_n as usize))
}

pub async fn search(
	cfg: &ProviderConfig,
	namespace: &str,
	query: &str,
	top_k: u32,
) -> Result<Vec<SearchHit>> {
	let client = crate::client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"namespace": namespace,
		"query": query,
		"top_k": top_k,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_response(json)
}

fn parse_search_response(json: Value) -> Result<Vec<SearchHit>> {
	let matches = json
		.get("matches")
		.or_else(|| json.get("data"))
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Search response is missing matches array.".to_string(),
		})?;
	let mut hits = Vec::with_capacity(matches.len());

	for item in matches {
		let content = item
			.get("content")
			.or_else(|| item.get("page_content"))
			.or_else(|| item.get("text"))
			.and_then(|v| v.as_str())
			.ok_or_else(|| Error::InvalidResponse {
				message: "Search match is missing content.".to_string(),
			})?;
		let metadata = item
			.get("metadata")
			.and_then(|v| v.as_object())
			.map(|map| {
				map.iter()
					.map(|(key, value)| {
						let value = match value {
							Value::String(text) => text.clone(),
							other => other.to_string(),
						};

						(key.clone(), value)
					})
					.collect()
			})
			.unwrap_or_default();

		hits.push(SearchHit { content: content.to_string(), metadata });
	}

	Ok(hits)
}

fn keep_top(hits: Vec<SearchHit>, scores: &[f32], top_n: usize) -> Vec<SearchHit> {
	let mut scored: Vec<(usize, f32, SearchHit)> = hits
		.into_iter()
		.enumerate()
		.map(|(index, hit)| (index, scores.get(index).copied().unwrap_or(0.0), hit))
		.collect();

	// Stable on ties so the back-end's order survives equal scores.
	scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
	scored.truncate(top_n);

	scored.into_iter().map(|(_, _, hit)| hit).collect()
}
