mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	CategoryRetrieval, Config, LlmProviderConfig, Messages, ProviderConfig, Providers, Relevance,
	Retrieval, SafetyProviderConfig, Service, Session,
};

use std::{fs, path::Path};

use serde_json::{Map, Value};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.request_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "service.request_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.session.window_size == 0 {
		return Err(Error::Validation {
			message: "session.window_size must be greater than zero.".to_string(),
		});
	}
	if cfg.session.timeout_secs == 0 {
		return Err(Error::Validation {
			message: "session.timeout_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.session.rewrite_history_turns == 0 {
		return Err(Error::Validation {
			message: "session.rewrite_history_turns must be greater than zero.".to_string(),
		});
	}
	if cfg.session.shards == 0 {
		return Err(Error::Validation {
			message: "session.shards must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("llm", &cfg.providers.llm.api_key),
		("search", &cfg.providers.search.api_key),
		("rerank", &cfg.providers.rerank.api_key),
		("safety", &cfg.providers.safety.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	for (label, headers) in [
		("llm", &cfg.providers.llm.default_headers),
		("search", &cfg.providers.search.default_headers),
		("rerank", &cfg.providers.rerank.default_headers),
		("safety", &cfg.providers.safety.default_headers),
	] {
		if !headers_are_strings(headers) {
			return Err(Error::Validation {
				message: format!("Provider {label} default_headers values must be strings."),
			});
		}
	}

	if !cfg.providers.llm.temperature.is_finite() || cfg.providers.llm.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}

	let safety = &cfg.providers.safety;

	for (label, value) in [
		("providers.safety.abuse_threshold", safety.abuse_threshold),
		("providers.safety.clean_min_score", safety.clean_min_score),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}
	if safety.abuse_label.trim().is_empty() || safety.clean_label.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.safety labels must be non-empty.".to_string(),
		});
	}

	for (label, retrieval) in [
		("policy", &cfg.retrieval.policy),
		("subject", &cfg.retrieval.subject),
		("admission", &cfg.retrieval.admission),
		("book", &cfg.retrieval.book),
		("seteuk", &cfg.retrieval.seteuk),
	] {
		if retrieval.namespace.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("retrieval.{label}.namespace must be non-empty."),
			});
		}
		if retrieval.top_n == 0 {
			return Err(Error::Validation {
				message: format!("retrieval.{label}.top_n must be greater than zero."),
			});
		}
		if retrieval.top_n > retrieval.candidate_k {
			return Err(Error::Validation {
				message: format!(
					"retrieval.{label}.top_n must be less than or equal to retrieval.{label}.candidate_k."
				),
			});
		}
	}

	if cfg.relevance.preview_chars == 0 {
		return Err(Error::Validation {
			message: "relevance.preview_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.messages.blocked.trim().is_empty() {
		return Err(Error::Validation {
			message: "messages.blocked must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	if cfg.service.log_level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}

	for retrieval in [
		&mut cfg.retrieval.policy,
		&mut cfg.retrieval.subject,
		&mut cfg.retrieval.admission,
		&mut cfg.retrieval.book,
		&mut cfg.retrieval.seteuk,
	] {
		retrieval.namespace = retrieval.namespace.trim().to_string();
	}
}

fn headers_are_strings(headers: &Map<String, Value>) -> bool {
	headers.values().all(Value::is_string)
}
