use std::{sync::Arc, time::Duration};

use moka::sync::Cache;
use tokio::sync::Mutex;

use consulta_domain::Message;

/// Per-session conversation record. Owned by the [`SessionStore`]; a turn
/// locks it for its whole duration, which serializes turns per thread while
/// distinct sessions proceed in parallel.
#[derive(Debug, Clone)]
pub struct ConversationState {
	pub thread_id: String,
	pub messages: Vec<Message>,
}
impl ConversationState {
	pub fn new(thread_id: impl Into<String>) -> Self {
		Self { thread_id: thread_id.into(), messages: Vec::new() }
	}
}

/// Bounded map of `thread_id` to conversation state. Capacity and idle TTL
/// keep abandoned sessions from accumulating.
pub struct SessionStore {
	cache: Cache<String, Arc<Mutex<ConversationState>>>,
}
impl SessionStore {
	pub fn new(cfg: &consulta_config::Session) -> Self {
		let cache = Cache::builder()
			.max_capacity(cfg.max_sessions)
			.time_to_idle(Duration::from_secs(cfg.idle_ttl_minutes * 60))
			.build();

		Self { cache }
	}

	pub fn get_or_create(&self, thread_id: &str) -> Arc<Mutex<ConversationState>> {
		self.cache.get_with(thread_id.to_string(), || {
			Arc::new(Mutex::new(ConversationState::new(thread_id)))
		})
	}

	pub fn session_count(&self) -> u64 {
		self.cache.run_pending_tasks();
		self.cache.entry_count()
	}
}
