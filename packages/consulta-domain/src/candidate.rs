use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which index produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
	Lexical,
	Semantic,
}
impl Origin {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lexical => "Lexical",
			Self::Semantic => "Semantic",
		}
	}
}

/// One retrieved unit. Immutable after creation; only the fusion engine
/// derives new scores from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
	pub content: String,
	pub origin: Origin,
	pub score: Option<f32>,
	pub metadata: Option<Value>,
}
impl Candidate {
	pub fn lexical(content: impl Into<String>, metadata: Option<Value>) -> Self {
		Self { content: content.into(), origin: Origin::Lexical, score: None, metadata }
	}

	pub fn semantic(content: impl Into<String>, score: f32, metadata: Option<Value>) -> Self {
		Self { content: content.into(), origin: Origin::Semantic, score: Some(score), metadata }
	}
}

/// A candidate after rank fusion. `fusion_score` is normalized to [0,1] and
/// only comparable within one fusion run; `sources` records every index that
/// contributed the candidate, in processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedResult {
	pub candidate: Candidate,
	pub fusion_score: f32,
	pub sources: Vec<Origin>,
}
impl FusedResult {
	pub fn content(&self) -> &str {
		&self.candidate.content
	}

	/// Joined provenance label, e.g. `"Semantic + Lexical"`.
	pub fn source_label(&self) -> String {
		self.sources.iter().map(|origin| origin.as_str()).collect::<Vec<_>>().join(" + ")
	}
}
