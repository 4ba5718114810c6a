use serde_json::Value;

/// One full-text match. `score` is absent by contract; the lexical index
/// exposes rank order only.
#[derive(Debug, Clone)]
pub struct LexicalHit {
	pub content: String,
	pub metadata: Option<Value>,
}

/// One vector-similarity match with its raw similarity score.
#[derive(Debug, Clone)]
pub struct SemanticHit {
	pub content: String,
	pub score: f32,
	pub metadata: Option<Value>,
}
