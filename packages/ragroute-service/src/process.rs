//! The routing/retry controller.
//!
//! ```text
//! Safety -> Route -> Grade -> Generate
//!                      |
//!                      +-> Reroute -> Grade -> Generate
//!                      |     |          |
//!                      |     +----------+-> Fallback
//!                      +-> Fallback
//! ```
//!
//! `Grade` is entered at most twice. The second entry always has `retried` set, so an
//! irrelevant second grade can only go to `Fallback`.

use serde::Serialize;
use serde_json::{Map, Value};

use ragroute_domain::{Category, Document, PromptKey, RelevanceScore, RouteDecision};

use crate::{Error, RagService, Result};

#[derive(Debug, Clone)]
pub struct ProcessRequest {
	pub question: String,
	pub user_id: String,
	/// Caller-supplied hint. Logged only; routing never trusts it.
	pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
	pub generation: String,
	/// `None` only when the safety gate blocked the question.
	pub prompt_key: Option<PromptKey>,
	pub visited_categories: Vec<Category>,
	pub retried: bool,
	pub relevance_score: Option<RelevanceScore>,
	pub evidence: Vec<Document>,
	pub stopped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
	Safety,
	Route,
	Grade,
	Reroute,
	Generate,
	Fallback,
	End,
}

struct RequestState {
	/// Latest rewrite of `original_question`, used for routing, retrieval and grading.
	question: String,
	original_question: String,
	user_id: String,
	category_hint: Option<String>,
	visited_categories: Vec<Category>,
	retried: bool,
	evidence: Vec<Document>,
	relevance_score: Option<RelevanceScore>,
	prompt_key: Option<PromptKey>,
	stopped: bool,
	generation: Option<String>,
}
impl RequestState {
	fn new(request: ProcessRequest) -> Self {
		Self {
			question: request.question.clone(),
			original_question: request.question,
			user_id: request.user_id,
			category_hint: request.category.filter(|hint| !hint.trim().is_empty()),
			visited_categories: Vec::new(),
			retried: false,
			evidence: Vec::new(),
			relevance_score: None,
			prompt_key: None,
			stopped: false,
			generation: None,
		}
	}

	fn details(&self) -> Map<String, Value> {
		let mut details = Map::new();

		details.insert("user_id".to_string(), Value::from(self.user_id.as_str()));
		details.insert("question".to_string(), Value::from(self.original_question.as_str()));
		details.insert(
			"prompt_key".to_string(),
			self.prompt_key.map(|key| Value::from(key.as_str())).unwrap_or(Value::Null),
		);
		details.insert(
			"visited_categories".to_string(),
			Value::from(
				self.visited_categories
					.iter()
					.map(|category| category.as_str())
					.collect::<Vec<_>>(),
			),
		);
		details.insert("retried".to_string(), Value::from(self.retried));

		if let Some(hint) = &self.category_hint {
			details.insert("category".to_string(), Value::from(hint.as_str()));
		}

		details
	}
}

impl RagService {
	/// Answers one question for one user.
	///
	/// Returns either a non-empty generation or an error. Everything except a failed safety
	/// screen and a failed generation is recovered internally.
	pub async fn process(&self, request: ProcessRequest) -> Result<Answer> {
		if request.user_id.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "user_id must be non-empty.".to_string() });
		}

		let mut state = RequestState::new(request);
		let mut step = Step::Safety;

		while step != Step::End {
			step = match step {
				Step::Safety => self.safety_step(&mut state).await?,
				Step::Route => self.route_step(&mut state).await,
				Step::Grade => self.grade_step(&mut state).await,
				Step::Reroute => self.reroute_step(&mut state).await,
				Step::Generate | Step::Fallback => self.generate_step(&mut state, step).await?,
				Step::End => Step::End,
			};
		}

		let Some(generation) = state.generation.take() else {
			return Err(Error::Generation {
				message: "Request ended without a generation.".to_string(),
				details: state.details(),
			});
		};

		tracing::info!(
			user_id = %state.user_id,
			category_hint = state.category_hint.as_deref().unwrap_or(""),
			prompt_key = state.prompt_key.map(PromptKey::as_str).unwrap_or("blocked"),
			visited = ?state.visited_categories,
			retried = state.retried,
			"Request completed."
		);

		Ok(Answer {
			generation,
			prompt_key: state.prompt_key,
			visited_categories: state.visited_categories,
			retried: state.retried,
			relevance_score: state.relevance_score,
			evidence: state.evidence,
			stopped: state.stopped,
		})
	}

	async fn safety_step(&self, state: &mut RequestState) -> Result<Step> {
		if !self.screen(&state.original_question).await? {
			return Ok(Step::Route);
		}

		tracing::info!(user_id = %state.user_id, "Question blocked by safety gate.");

		state.stopped = true;
		state.generation = Some(self.cfg.messages.blocked.clone());

		Ok(Step::End)
	}

	async fn route_step(&self, state: &mut RequestState) -> Step {
		state.question = self.rewrite_query(&state.user_id, &state.original_question).await;

		match self.route_question(&state.question).await {
			RouteDecision::Category(category) => {
				state.evidence = self.retrieve_evidence(category, &state.question).await;
				state.visited_categories = vec![category];
				state.retried = false;
				state.prompt_key = Some(PromptKey::Category(category));

				Step::Grade
			},
			RouteDecision::Fallback | RouteDecision::Unparseable(_) => {
				state.prompt_key = Some(PromptKey::Fallback);

				Step::Fallback
			},
		}
	}

	async fn grade_step(&self, state: &mut RequestState) -> Step {
		let verdict = self.grade_evidence(&state.question, &state.evidence).await;

		state.relevance_score = Some(verdict.score());

		if verdict.is_relevant() {
			return Step::Generate;
		}

		state.prompt_key = Some(PromptKey::Fallback);

		if state.retried { Step::Fallback } else { Step::Reroute }
	}

	async fn reroute_step(&self, state: &mut RequestState) -> Step {
		state.question = self.rewrite_query(&state.user_id, &state.original_question).await;

		let decision = self.reroute_question(&state.question, &state.visited_categories).await;

		state.retried = true;

		match decision {
			RouteDecision::Category(category) if !state.visited_categories.contains(&category) => {
				state.evidence = self.retrieve_evidence(category, &state.question).await;
				state.visited_categories.push(category);
				state.prompt_key = Some(PromptKey::Category(category));

				Step::Grade
			},
			RouteDecision::Category(category) => {
				tracing::warn!(%category, "Re-router repeated a visited category; using fallback.");

				Step::Fallback
			},
			RouteDecision::Fallback | RouteDecision::Unparseable(_) => Step::Fallback,
		}
	}

	async fn generate_step(&self, state: &mut RequestState, step: Step) -> Result<Step> {
		let prompt_key = match step {
			Step::Generate => state.prompt_key.unwrap_or(PromptKey::Fallback),
			_ => PromptKey::Fallback,
		};

		state.prompt_key = Some(prompt_key);

		let evidence: &[Document] = if prompt_key.is_fallback() { &[] } else { &state.evidence };
		let history =
			self.sessions.recent_history_text(&state.user_id, self.sessions.window_size());
		let generation = self
			.providers
			.generator
			.generate(
				&self.cfg.providers.llm,
				prompt_key,
				&state.original_question,
				evidence,
				&history,
			)
			.await
			.map_err(|err| Error::Generation {
				message: err.to_string(),
				details: state.details(),
			})?;

		if generation.trim().is_empty() {
			return Err(Error::Generation {
				message: "Generator returned empty text.".to_string(),
				details: state.details(),
			});
		}

		self.sessions.append_turn(&state.user_id, &state.original_question, &generation);

		state.generation = Some(generation);

		Ok(Step::End)
	}
}
