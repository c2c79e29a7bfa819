use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ragroute_domain::Document;
use ragroute_service::{Error as ServiceError, ProcessRequest};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
	pub question: String,
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
	pub user_id: String,
	pub question: String,
	pub answer: String,
	pub documents: Vec<Document>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/chat/", post(chat))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let user_id = payload
		.user_id
		.filter(|user_id| !user_id.trim().is_empty())
		.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
	let request = ProcessRequest {
		question: payload.question.clone(),
		user_id: user_id.clone(),
		category: payload.category,
	};
	let timeout = state.request_timeout();
	let answer = match tokio::time::timeout(timeout, state.service.process(request)).await {
		Ok(result) => result?,
		Err(_) => {
			let timeout_ms = timeout.as_millis() as u64;

			tracing::warn!(%user_id, timeout_ms, "Chat request timed out.");

			let mut details = Map::new();

			details.insert("user_id".to_string(), Value::from(user_id));
			details.insert("timeout_ms".to_string(), Value::from(timeout_ms));

			return Err(json_error(StatusCode::GATEWAY_TIMEOUT, "Request timed out.", details));
		},
	};

	Ok(Json(ChatResponse {
		user_id,
		question: payload.question,
		answer: answer.generation,
		documents: answer.evidence,
	}))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	details: Map<String, Value>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	details: Map<String, Value>,
}

pub fn json_error(
	status: StatusCode,
	error: impl Into<String>,
	details: Map<String, Value>,
) -> ApiError {
	ApiError { status, error: error.into(), details }
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let status = match err {
			ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
			ServiceError::Safety { .. }
			| ServiceError::Generation { .. }
			| ServiceError::Provider { .. } => StatusCode::BAD_GATEWAY,
		};

		tracing::error!(error = %err, status = status.as_u16(), "Chat request failed.");

		json_error(status, err.to_string(), err.details())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.error, details: self.details };

		(self.status, Json(body)).into_response()
	}
}
