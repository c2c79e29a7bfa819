pub mod category;
pub mod document;
pub mod prompt_key;
pub mod relevance;
pub mod route;

pub use category::{CATALOG, Category, FALLBACK_LABEL};
pub use document::{Document, SENTINEL_METADATA_KEY};
pub use prompt_key::PromptKey;
pub use relevance::{RelevanceScore, RelevanceVerdict};
pub use route::RouteDecision;
