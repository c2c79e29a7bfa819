use crate::{Result, chat, prompts};
use ragroute_config::LlmProviderConfig;

/// Returns the grader's raw reply. The caller decides what counts as a verdict.
pub async fn grade(cfg: &LlmProviderConfig, question: &str, docs_preview: &str) -> Result<String> {
	let user = format!("질문: {question}\n\n문서 미리보기:\n{docs_preview}\n\n관련 여부만 숫자로 답해:");
	let messages = [chat::message("system", prompts::GRADE_SYSTEM), chat::message("user", user)];

	chat::complete(cfg, &messages).await
}
