pub mod agent;
pub mod prompt;
pub mod retrieve;
pub mod session;

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use consulta_config::{ChatProviderConfig, Config, EmbeddingProviderConfig, RerankProviderConfig};
use consulta_domain::Origin;
use consulta_providers::{chat, embedding, rerank};
use consulta_storage::{
	lexical::LexicalIndex,
	models::{LexicalHit, SemanticHit},
	qdrant::QdrantStore,
};

pub use agent::{AskRequest, AskResponse, REFUSAL};
pub use consulta_providers::chat::RetrievalDirective;
pub use session::{ConversationState, SessionStore};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait RerankProvider
where
	Self: Send + Sync,
{
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;

	fn request_retrieval<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<chat::RetrievalDirective>>;
}

/// Query seam over a pre-built full-text index.
pub trait LexicalSearcher
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, consulta_storage::Result<Vec<LexicalHit>>>;
}

/// Query seam over a pre-built vector-similarity index.
pub trait SemanticSearcher
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		k: u32,
	) -> BoxFuture<'a, consulta_storage::Result<Vec<SemanticHit>>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	UnknownCategory { name: String },
	RetrievalUnavailable { origin: Origin, message: String },
	RerankUnavailable { message: String },
	Ungrounded,
	GenerationFailed { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::UnknownCategory { name } => write!(f, "Unknown category: {name}."),
			Self::RetrievalUnavailable { origin, message } => {
				write!(f, "{} retrieval unavailable: {message}", origin.as_str())
			},
			Self::RerankUnavailable { message } => write!(f, "Rerank unavailable: {message}"),
			Self::Ungrounded => write!(f, "Assembled context shares no term with the question."),
			Self::GenerationFailed { message } => write!(f, "{message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
	pub chat: Arc<dyn ChatProvider>,
}

/// One queryable document corpus: a name plus its two index handles.
pub struct Category {
	pub name: String,
	pub lexical: Arc<dyn LexicalSearcher>,
	pub semantic: Arc<dyn SemanticSearcher>,
}

/// A [`SemanticSearcher`] bound to one Qdrant collection of the shared store.
pub struct QdrantCollection {
	store: Arc<QdrantStore>,
	collection: String,
}
impl QdrantCollection {
	pub fn new(store: Arc<QdrantStore>, collection: impl Into<String>) -> Self {
		Self { store, collection: collection.into() }
	}
}

pub struct Service {
	pub cfg: Config,
	pub providers: Providers,
	categories: HashMap<String, Category>,
	sessions: SessionStore,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl RerankProvider for DefaultProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(rerank::rerank(cfg, query, docs))
	}
}

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(chat::complete(cfg, messages))
	}

	fn request_retrieval<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<chat::RetrievalDirective>> {
		Box::pin(chat::request_retrieval(cfg, messages))
	}
}

impl LexicalSearcher for LexicalIndex {
	fn search<'a>(
		&'a self,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, consulta_storage::Result<Vec<LexicalHit>>> {
		Box::pin(LexicalIndex::search(self, query, limit))
	}
}

impl SemanticSearcher for QdrantCollection {
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		k: u32,
	) -> BoxFuture<'a, consulta_storage::Result<Vec<SemanticHit>>> {
		Box::pin(async move { self.store.search(&self.collection, vector, k).await })
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		rerank: Arc<dyn RerankProvider>,
		chat: Arc<dyn ChatProvider>,
	) -> Self {
		Self { embedding, rerank, chat }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), rerank: provider.clone(), chat: provider }
	}
}

impl Service {
	pub fn new(cfg: Config, categories: Vec<Category>) -> Self {
		Self::with_providers(cfg, categories, Providers::default())
	}

	pub fn with_providers(cfg: Config, categories: Vec<Category>, providers: Providers) -> Self {
		let sessions = SessionStore::new(&cfg.session);
		let categories =
			categories.into_iter().map(|category| (category.name.clone(), category)).collect();

		Self { cfg, providers, categories, sessions }
	}

	pub fn sessions(&self) -> &SessionStore {
		&self.sessions
	}

	pub fn has_category(&self, name: &str) -> bool {
		self.categories.contains_key(name)
	}

	pub(crate) fn category(&self, name: &str) -> ServiceResult<&Category> {
		self.categories
			.get(name)
			.ok_or_else(|| ServiceError::UnknownCategory { name: name.to_string() })
	}
}
