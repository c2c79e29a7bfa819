use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub session: Session,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub relevance: Relevance,
	#[serde(default)]
	pub messages: Messages,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Session {
	/// Number of user/bot exchanges kept per user.
	pub window_size: usize,
	/// Idle time after which a session starts over with empty history.
	pub timeout_secs: u64,
	/// Exchanges folded into the question by the rewriter.
	pub rewrite_history_turns: usize,
	pub shards: usize,
	/// Zero disables the background sweep; idle sessions are then only reset on next access.
	pub sweep_interval_secs: u64,
}
impl Default for Session {
	fn default() -> Self {
		Self {
			window_size: 3,
			timeout_secs: 300,
			rewrite_history_turns: 3,
			shards: 16,
			sweep_interval_secs: 0,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	pub search: ProviderConfig,
	pub rerank: ProviderConfig,
	pub safety: SafetyProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SafetyProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	#[serde(default = "default_abuse_label")]
	pub abuse_label: String,
	#[serde(default = "default_abuse_threshold")]
	pub abuse_threshold: f32,
	#[serde(default = "default_clean_label")]
	pub clean_label: String,
	#[serde(default = "default_clean_min_score")]
	pub clean_min_score: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_policy_retrieval")]
	pub policy: CategoryRetrieval,
	#[serde(default = "default_subject_retrieval")]
	pub subject: CategoryRetrieval,
	#[serde(default = "default_admission_retrieval")]
	pub admission: CategoryRetrieval,
	#[serde(default = "default_book_retrieval")]
	pub book: CategoryRetrieval,
	#[serde(default = "default_seteuk_retrieval")]
	pub seteuk: CategoryRetrieval,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self {
			policy: default_policy_retrieval(),
			subject: default_subject_retrieval(),
			admission: default_admission_retrieval(),
			book: default_book_retrieval(),
			seteuk: default_seteuk_retrieval(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRetrieval {
	pub namespace: String,
	/// Candidates requested from the search back-end before reranking.
	pub candidate_k: u32,
	/// Candidates kept after reranking.
	pub top_n: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Relevance {
	/// Per-document character budget of the evidence preview shown to the grader.
	pub preview_chars: usize,
}
impl Default for Relevance {
	fn default() -> Self {
		Self { preview_chars: 1_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Messages {
	pub blocked: String,
}
impl Default for Messages {
	fn default() -> Self {
		Self { blocked: "⚠️ 부적절한 언어가 포함되어 있습니다.".to_string() }
	}
}

fn category_retrieval(namespace: &str, candidate_k: u32, top_n: u32) -> CategoryRetrieval {
	CategoryRetrieval { namespace: namespace.to_string(), candidate_k, top_n }
}

fn default_policy_retrieval() -> CategoryRetrieval {
	category_retrieval("policy", 6, 4)
}

fn default_subject_retrieval() -> CategoryRetrieval {
	category_retrieval("subject", 6, 4)
}

fn default_admission_retrieval() -> CategoryRetrieval {
	category_retrieval("admission", 30, 7)
}

fn default_book_retrieval() -> CategoryRetrieval {
	category_retrieval("book", 8, 4)
}

fn default_seteuk_retrieval() -> CategoryRetrieval {
	category_retrieval("seteuk", 6, 4)
}

fn default_request_timeout_ms() -> u64 {
	120_000
}

fn default_abuse_label() -> String {
	"악플/욕설".to_string()
}

fn default_abuse_threshold() -> f32 {
	0.5
}

fn default_clean_label() -> String {
	"clean".to_string()
}

fn default_clean_min_score() -> f32 {
	0.3
}
