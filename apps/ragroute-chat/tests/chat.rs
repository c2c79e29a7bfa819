use std::{sync::Arc, time::Duration};

use serde_json::Map;
use tokio::io::BufReader;

use ragroute_chat::{ChatExit, chat_loop};
use ragroute_config::{
	Config, LlmProviderConfig, Messages, ProviderConfig, Providers as ProviderConfigs, Relevance,
	Retrieval, SafetyProviderConfig, Service, Session,
};
use ragroute_domain::{Category, Document, PromptKey};
use ragroute_service::{
	BoxFuture, Error, GenerationProvider, GradeProvider, Providers, RagService, Result,
	RetrievalProvider, RewriteProvider, RouterProvider, SafetyProvider,
};

/// Sends every question to the fallback prompt and echoes it back. Questions containing
/// `실패` fail generation.
struct EchoProviders;
impl SafetyProvider for EchoProviders {
	fn screen<'a>(
		&'a self,
		_cfg: &'a SafetyProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(false) })
	}
}

impl RewriteProvider for EchoProviders {
	fn rewrite<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_history: &'a str,
		question: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(question.to_string()) })
	}
}

impl RouterProvider for EchoProviders {
	fn route<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_question: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok("llm_fallback".to_string()) })
	}

	fn reroute<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_question: &'a str,
		_visited: &'a [Category],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok("llm_fallback".to_string()) })
	}
}

impl RetrievalProvider for EchoProviders {
	fn retrieve<'a>(
		&'a self,
		_cfg: &'a Config,
		_category: Category,
		_query: &'a str,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}
}

impl GradeProvider for EchoProviders {
	fn grade<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_question: &'a str,
		_docs_preview: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok("0".to_string()) })
	}
}

impl GenerationProvider for EchoProviders {
	fn generate<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_prompt_key: PromptKey,
		question: &'a str,
		_evidence: &'a [Document],
		_history: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			if question.contains("실패") {
				return Err(Error::Provider { message: "model overloaded".to_string() });
			}

			Ok(format!("답: {question}"))
		})
	}
}

fn llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://localhost".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "test".to_string(),
		temperature: 0.0,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

fn provider() -> ProviderConfig {
	ProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://localhost".to_string(),
		api_key: "test-key".to_string(),
		path: "/".to_string(),
		model: "test".to_string(),
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

fn service() -> RagService {
	let config = Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			request_timeout_ms: 1_000,
		},
		session: Session::default(),
		providers: ProviderConfigs {
			llm: llm_provider(),
			search: provider(),
			rerank: provider(),
			safety: SafetyProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "test-key".to_string(),
				path: "/classify".to_string(),
				timeout_ms: 1_000,
				default_headers: Map::new(),
				abuse_label: "악플/욕설".to_string(),
				abuse_threshold: 0.5,
				clean_label: "clean".to_string(),
				clean_min_score: 0.3,
			},
		},
		retrieval: Retrieval::default(),
		relevance: Relevance::default(),
		messages: Messages::default(),
	};
	let stub = Arc::new(EchoProviders);
	let providers = Providers::new(
		stub.clone(),
		stub.clone(),
		stub.clone(),
		stub.clone(),
		stub.clone(),
		stub,
	);

	RagService::with_providers(config, providers)
}

#[tokio::test]
async fn answers_until_empty_line() {
	let service = service();
	let mut output = Vec::new();
	let exit = chat_loop(
		&service,
		"local",
		BufReader::new("졸업 요건 알려줘\n실패해줘\n\n무시됨\n".as_bytes()),
		&mut output,
		Duration::from_secs(300),
	)
	.await
	.expect("Failed to run chat loop.");
	let output = String::from_utf8(output).expect("Output must be UTF-8.");

	assert_eq!(exit, ChatExit::EmptyLine);
	assert!(output.contains("🤖 답변: 답: 졸업 요건 알려줘\n"));
	assert!(output.contains("⚠️ 오류: Generation failed"));
	assert!(output.ends_with("종료합니다.\n"));
	assert!(!output.contains("무시됨"));
	assert_eq!(service.sessions.get("local").history.len(), 1);
}

#[tokio::test]
async fn stops_at_end_of_input() {
	let service = service();
	let mut output = Vec::new();
	let exit = chat_loop(
		&service,
		"local",
		BufReader::new("하나\n".as_bytes()),
		&mut output,
		Duration::from_secs(300),
	)
	.await
	.expect("Failed to run chat loop.");

	assert_eq!(exit, ChatExit::EndOfInput);
}

#[tokio::test(start_paused = true)]
async fn exits_after_idle_timeout() {
	let service = service();
	// The writer half stays open, so the reader blocks instead of seeing end of input.
	let (_writer, reader) = tokio::io::duplex(64);
	let mut output = Vec::new();
	let exit = chat_loop(
		&service,
		"local",
		BufReader::new(reader),
		&mut output,
		Duration::from_secs(300),
	)
	.await
	.expect("Failed to run chat loop.");
	let output = String::from_utf8(output).expect("Output must be UTF-8.");

	assert_eq!(exit, ChatExit::Idle);
	assert!(output.contains("5분 동안 입력이 없어 챗봇을 종료합니다."));
}
