use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
	pub fusion: Fusion,
	pub rerank: Rerank,
	pub context: Context,
	pub session: Session,
	pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: RerankProviderConfig,
	pub chat: ChatProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RerankProviderConfig {
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
pub struct ChatProviderConfig {
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
pub struct Retrieval {
	/// Upper bound on full-text matches per query.
	pub max_results_lexical: u32,
	/// Upper bound on vector-similarity matches per query.
	pub max_results_semantic: u32,
	/// Budget for one retriever call; a timed-out retriever degrades to an
	/// empty result instead of failing the turn.
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fusion {
	pub rrf_k: u32,
	pub dedup_prefix_chars: u32,
	pub top_n: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rerank {
	pub enabled: bool,
	pub top_k: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
	pub max_words: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
	pub max_sessions: u64,
	pub idle_ttl_minutes: u64,
}

/// One queryable document corpus, served as its own HTTP endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
	pub name: String,
	pub lexical_db_path: String,
	pub collection: String,
}
