use crate::{Result, chat, prompts};
use ragroute_config::LlmProviderConfig;

pub async fn rewrite(cfg: &LlmProviderConfig, history: &str, question: &str) -> Result<String> {
	let user = format!("대화 기록:\n{history}\n\n질문: {question}\n\n보완된 질문:");
	let messages = [chat::message("system", prompts::REWRITE_SYSTEM), chat::message("user", user)];
	let rewritten = chat::complete(cfg, &messages).await?;

	Ok(rewritten.trim().to_string())
}
