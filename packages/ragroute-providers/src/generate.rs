use crate::{Result, chat, prompts};
use ragroute_config::LlmProviderConfig;

pub async fn generate(
	cfg: &LlmProviderConfig,
	prompt_key: &str,
	question: &str,
	documents: &str,
	history: &str,
) -> Result<String> {
	let system = prompts::generation_system(prompt_key);
	let user = if documents.is_empty() {
		format!("Question: {question}\nHistory: {history}")
	} else {
		format!("Answer using:\nDocuments: {documents}\nQuestion: {question}\nHistory: {history}")
	};
	let messages = [chat::message("system", system), chat::message("user", user)];

	chat::complete(cfg, &messages).await
}
