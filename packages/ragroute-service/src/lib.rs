pub mod process;
pub mod relevance;
pub mod retrieval;
pub mod rewrite;
pub mod router;
pub mod safety;
pub mod session;

mod error;

pub use error::{Error, Result};
pub use process::{Answer, ProcessRequest};
pub use session::{Exchange, SESSION_TIMEOUT, SessionRecord, SessionStore, WINDOW_SIZE};

use std::{future::Future, pin::Pin, sync::Arc};

use ragroute_config::{Config, LlmProviderConfig, SafetyProviderConfig};
use ragroute_domain::{Category, Document, PromptKey};
use ragroute_providers as providers;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SafetyProvider
where
	Self: Send + Sync,
{
	fn screen<'a>(
		&'a self,
		cfg: &'a SafetyProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<bool>>;
}

pub trait RewriteProvider
where
	Self: Send + Sync,
{
	fn rewrite<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		history: &'a str,
		question: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

/// Both methods return the classifier's raw label; parsing into a
/// [`ragroute_domain::RouteDecision`] happens in the service.
pub trait RouterProvider
where
	Self: Send + Sync,
{
	fn route<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		question: &'a str,
	) -> BoxFuture<'a, Result<String>>;

	fn reroute<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		question: &'a str,
		visited: &'a [Category],
	) -> BoxFuture<'a, Result<String>>;
}

pub trait RetrievalProvider
where
	Self: Send + Sync,
{
	fn retrieve<'a>(
		&'a self,
		cfg: &'a Config,
		category: Category,
		query: &'a str,
	) -> BoxFuture<'a, Result<Vec<Document>>>;
}

/// Returns the grader's raw reply; only `"1"` and `"0"` are verdicts.
pub trait GradeProvider
where
	Self: Send + Sync,
{
	fn grade<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		question: &'a str,
		docs_preview: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt_key: PromptKey,
		question: &'a str,
		evidence: &'a [Document],
		history: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub safety: Arc<dyn SafetyProvider>,
	pub rewrite: Arc<dyn RewriteProvider>,
	pub router: Arc<dyn RouterProvider>,
	pub retrieval: Arc<dyn RetrievalProvider>,
	pub grader: Arc<dyn GradeProvider>,
	pub generator: Arc<dyn GenerationProvider>,
}
impl Providers {
	pub fn new(
		safety: Arc<dyn SafetyProvider>,
		rewrite: Arc<dyn RewriteProvider>,
		router: Arc<dyn RouterProvider>,
		retrieval: Arc<dyn RetrievalProvider>,
		grader: Arc<dyn GradeProvider>,
		generator: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { safety, rewrite, router, retrieval, grader, generator }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self {
			safety: provider.clone(),
			rewrite: provider.clone(),
			router: provider.clone(),
			retrieval: provider.clone(),
			grader: provider.clone(),
			generator: provider,
		}
	}
}

/// The routing/retry controller and the session memory it rewrites questions against.
pub struct RagService {
	pub cfg: Config,
	pub sessions: SessionStore,
	pub providers: Providers,
}
impl RagService {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let sessions = SessionStore::from_config(&cfg.session);

		Self { cfg, sessions, providers }
	}
}

struct DefaultProviders;

impl SafetyProvider for DefaultProviders {
	fn screen<'a>(
		&'a self,
		cfg: &'a SafetyProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(providers::safety::screen(cfg, text).await?) })
	}
}

impl RewriteProvider for DefaultProviders {
	fn rewrite<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		history: &'a str,
		question: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(providers::rewrite::rewrite(cfg, history, question).await?) })
	}
}

impl RouterProvider for DefaultProviders {
	fn route<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		question: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(providers::router::route(cfg, question, &[]).await?) })
	}

	fn reroute<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		question: &'a str,
		visited: &'a [Category],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			let tools: Vec<&str> = visited.iter().map(|category| category.tool_name()).collect();

			Ok(providers::router::route(cfg, question, &tools).await?)
		})
	}
}

impl RetrievalProvider for DefaultProviders {
	fn retrieve<'a>(
		&'a self,
		cfg: &'a Config,
		category: Category,
		query: &'a str,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			let hits = providers::retrieval::retrieve(
				&cfg.providers.search,
				&cfg.providers.rerank,
				category_retrieval(cfg, category),
				query,
			)
			.await?;

			Ok(hits
				.into_iter()
				.map(|hit| Document { content: hit.content, metadata: hit.metadata })
				.collect())
		})
	}
}

impl GradeProvider for DefaultProviders {
	fn grade<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		question: &'a str,
		docs_preview: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			Ok(providers::grader::grade(cfg, question, docs_preview).await?)
		})
	}
}

impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt_key: PromptKey,
		question: &'a str,
		evidence: &'a [Document],
		history: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			let documents = ragroute_domain::document::render_for_generation(evidence);

			let generation = providers::generate::generate(
				cfg,
				prompt_key.as_str(),
				question,
				&documents,
				history,
			)
			.await?;

			Ok(generation)
		})
	}
}

/// Static category-to-retrieval table; the fallback sentinel has no entry.
pub(crate) fn category_retrieval(
	cfg: &Config,
	category: Category,
) -> &ragroute_config::CategoryRetrieval {
	match category {
		Category::Policy => &cfg.retrieval.policy,
		Category::Subject => &cfg.retrieval.subject,
		Category::Admission => &cfg.retrieval.admission,
		Category::Book => &cfg.retrieval.book,
		Category::Seteuk => &cfg.retrieval.seteuk,
	}
}
