mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Category, ChatProviderConfig, Config, Context, EmbeddingProviderConfig, Fusion, Providers,
	Qdrant, Rerank, RerankProviderConfig, Retrieval, Service, Session, Storage,
};

use std::{collections::HashSet, fs, path::Path};

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
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if !cfg.providers.chat.temperature.is_finite() || cfg.providers.chat.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.chat.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}

	for (label, model) in [
		("embedding", &cfg.providers.embedding.model),
		("rerank", &cfg.providers.rerank.model),
		("chat", &cfg.providers.chat.model),
	] {
		if model.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} model must be non-empty."),
			});
		}
	}
	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("chat", &cfg.providers.chat.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	if cfg.rerank.enabled && cfg.providers.rerank.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.rerank.api_key must be non-empty when rerank.enabled is true."
				.to_string(),
		});
	}

	if cfg.retrieval.max_results_lexical == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_results_lexical must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.max_results_semantic == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_results_semantic must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "retrieval.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.fusion.rrf_k == 0 {
		return Err(Error::Validation {
			message: "fusion.rrf_k must be greater than zero.".to_string(),
		});
	}
	if cfg.fusion.dedup_prefix_chars == 0 {
		return Err(Error::Validation {
			message: "fusion.dedup_prefix_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.fusion.top_n == 0 {
		return Err(Error::Validation {
			message: "fusion.top_n must be greater than zero.".to_string(),
		});
	}
	if cfg.rerank.top_k == 0 {
		return Err(Error::Validation {
			message: "rerank.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.context.max_words == 0 {
		return Err(Error::Validation {
			message: "context.max_words must be greater than zero.".to_string(),
		});
	}
	if cfg.session.max_sessions == 0 {
		return Err(Error::Validation {
			message: "session.max_sessions must be greater than zero.".to_string(),
		});
	}
	if cfg.session.idle_ttl_minutes == 0 {
		return Err(Error::Validation {
			message: "session.idle_ttl_minutes must be greater than zero.".to_string(),
		});
	}

	if cfg.categories.is_empty() {
		return Err(Error::Validation {
			message: "categories must contain at least one entry.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for category in &cfg.categories {
		for (label, value) in [
			("categories.name", &category.name),
			("categories.lexical_db_path", &category.lexical_db_path),
			("categories.collection", &category.collection),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}
		if !seen.insert(category.name.as_str()) {
			return Err(Error::Validation {
				message: format!("Category name {:?} is duplicated.", category.name),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for category in &mut cfg.categories {
		category.name = category.name.trim().to_string();
	}
}
