use std::time::Duration;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use ragroute_api::{routes, state::AppState};
use ragroute_config::{
	Config, LlmProviderConfig, Messages, ProviderConfig, Providers as ProviderConfigs, Relevance,
	Retrieval, SafetyProviderConfig, Service, Session,
};
use ragroute_domain::{Category, Document, PromptKey};
use ragroute_service::{
	BoxFuture, Error, GenerationProvider, GradeProvider, Providers, RagService, Result,
	RetrievalProvider, RewriteProvider, RouterProvider, SafetyProvider,
};

#[derive(Clone, Copy)]
enum Generation {
	Answer,
	Fail,
	Stall,
}

/// Routes everything to `policy` and grades it relevant; generation behaves as configured.
struct StubProviders {
	generation: Generation,
}
impl SafetyProvider for StubProviders {
	fn screen<'a>(
		&'a self,
		_cfg: &'a SafetyProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(text.contains("꺼져")) })
	}
}

impl RewriteProvider for StubProviders {
	fn rewrite<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_history: &'a str,
		question: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(question.to_string()) })
	}
}

impl RouterProvider for StubProviders {
	fn route<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_question: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok("{\"tool\": \"search_policy\"}".to_string()) })
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

impl RetrievalProvider for StubProviders {
	fn retrieve<'a>(
		&'a self,
		_cfg: &'a Config,
		_category: Category,
		_query: &'a str,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			Ok(vec![
				Document::new("졸업하려면 192학점을 이수해야 합니다.")
					.with_metadata("source", "credit_guide.pdf"),
			])
		})
	}
}

impl GradeProvider for StubProviders {
	fn grade<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_question: &'a str,
		_docs_preview: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok("1".to_string()) })
	}
}

impl GenerationProvider for StubProviders {
	fn generate<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		prompt_key: PromptKey,
		_question: &'a str,
		_evidence: &'a [Document],
		_history: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		let generation = self.generation;

		Box::pin(async move {
			match generation {
				Generation::Answer =>
					Ok(format!("[{prompt_key}] 192학점 이상 이수하면 졸업할 수 있어요.")),
				Generation::Fail =>
					Err(Error::Provider { message: "model overloaded".to_string() }),
				Generation::Stall => {
					tokio::time::sleep(Duration::from_secs(60)).await;

					Ok("too late".to_string())
				},
			}
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

fn test_config() -> Config {
	Config {
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
	}
}

fn app(generation: Generation) -> Router {
	let stub = std::sync::Arc::new(StubProviders { generation });
	let providers = Providers::new(
		stub.clone(),
		stub.clone(),
		stub.clone(),
		stub.clone(),
		stub.clone(),
		stub,
	);

	routes::router(AppState::with_service(RagService::with_providers(test_config(), providers)))
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/chat/")
				.header("content-type", "application/json")
				.body(Body::from(body.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /chat/.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let json = serde_json::from_slice(&bytes).expect("Failed to parse response body.");

	(status, json)
}

#[tokio::test]
async fn health_is_ok() {
	let response = app(Generation::Answer)
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_returns_answer_and_documents() {
	let (status, json) = post_chat(
		app(Generation::Answer),
		serde_json::json!({ "question": "졸업 요건이 뭐야?", "user_id": "student-1" }),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["user_id"], "student-1");
	assert_eq!(json["question"], "졸업 요건이 뭐야?");
	assert_eq!(json["answer"], "[policy] 192학점 이상 이수하면 졸업할 수 있어요.");
	assert_eq!(json["documents"][0]["metadata"]["source"], "credit_guide.pdf");
}

#[tokio::test]
async fn missing_user_id_gets_generated() {
	let (status, json) =
		post_chat(app(Generation::Answer), serde_json::json!({ "question": "졸업 요건" })).await;

	assert_eq!(status, StatusCode::OK);

	let user_id = json["user_id"].as_str().expect("Expected user_id string.");

	assert!(uuid::Uuid::parse_str(user_id).is_ok());
}

#[tokio::test]
async fn blocked_question_returns_notice() {
	let (status, json) = post_chat(
		app(Generation::Answer),
		serde_json::json!({ "question": "시*발 꺼져", "user_id": "student-2" }),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["answer"], "⚠️ 부적절한 언어가 포함되어 있습니다.");
	assert_eq!(json["documents"], serde_json::json!([]));
}

#[tokio::test]
async fn generation_failure_is_bad_gateway_with_details() {
	let (status, json) = post_chat(
		app(Generation::Fail),
		serde_json::json!({ "question": "졸업 요건", "user_id": "student-3" }),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert!(json["error"].as_str().is_some_and(|error| error.starts_with("Generation failed")));
	assert_eq!(json["details"]["user_id"], "student-3");
	assert_eq!(json["details"]["prompt_key"], "policy");
}

#[tokio::test(start_paused = true)]
async fn slow_request_times_out() {
	let (status, json) = post_chat(
		app(Generation::Stall),
		serde_json::json!({ "question": "졸업 요건", "user_id": "student-4" }),
	)
	.await;

	assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
	assert_eq!(json["details"]["timeout_ms"], 1_000);
}
