mod error;

pub use error::{Error, Result};

use serde_json::Map;
use sqlx::sqlite::SqlitePoolOptions;

use consulta_config::{
	Category, ChatProviderConfig, Config, Context, EmbeddingProviderConfig, Fusion, Providers,
	Qdrant, Rerank, RerankProviderConfig, Retrieval, Service, Session, Storage,
};
use consulta_storage::lexical::LexicalIndex;

pub const TEST_VECTOR_DIM: u32 = 4;

/// A config with offline provider endpoints and one entry per category name.
/// Every knob matches the defaults the orchestrator tests assume: fusion
/// 60/150/150, rerank disabled with `top_k = 3`, a generous word budget.
pub fn test_config(categories: &[&str]) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://localhost:6334".to_string(),
				vector_dim: TEST_VECTOR_DIM,
			},
		},
		providers: Providers {
			embedding: test_embedding_provider(),
			rerank: test_rerank_provider(),
			chat: test_chat_provider(),
		},
		retrieval: Retrieval {
			max_results_lexical: 100,
			max_results_semantic: 50,
			timeout_ms: 1_000,
		},
		fusion: Fusion { rrf_k: 60, dedup_prefix_chars: 150, top_n: 150 },
		rerank: Rerank { enabled: false, top_k: 3 },
		context: Context { max_words: 1_000_000 },
		session: Session { max_sessions: 100, idle_ttl_minutes: 60 },
		categories: categories
			.iter()
			.map(|name| Category {
				name: name.to_string(),
				lexical_db_path: format!("{name}.db"),
				collection: format!("fragment_store_{name}"),
			})
			.collect(),
	}
}

pub fn test_embedding_provider() -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "p".to_string(),
		api_base: "http://localhost".to_string(),
		api_key: "key".to_string(),
		path: "/v1/embeddings".to_string(),
		model: "m".to_string(),
		dimensions: TEST_VECTOR_DIM,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn test_rerank_provider() -> RerankProviderConfig {
	RerankProviderConfig {
		provider_id: "p".to_string(),
		api_base: "http://localhost".to_string(),
		api_key: "key".to_string(),
		path: "/v1/rerank".to_string(),
		model: "m".to_string(),
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn test_chat_provider() -> ChatProviderConfig {
	ChatProviderConfig {
		provider_id: "p".to_string(),
		api_base: "http://localhost".to_string(),
		api_key: "key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "m".to_string(),
		temperature: 0.0,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

/// Builds an in-memory FTS5 index seeded with `(content, metadata_json)`
/// rows, shaped exactly like the production `chunks` table.
pub async fn memory_lexical_index(rows: &[(&str, Option<&str>)]) -> Result<LexicalIndex> {
	let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await?;

	sqlx::query("CREATE VIRTUAL TABLE chunks USING fts5(content, metadata UNINDEXED)")
		.execute(&pool)
		.await?;

	for &(content, metadata) in rows {
		sqlx::query("INSERT INTO chunks (content, metadata) VALUES (?, ?)")
			.bind(content)
			.bind(metadata)
			.execute(&pool)
			.await?;
	}

	Ok(LexicalIndex { pool })
}
