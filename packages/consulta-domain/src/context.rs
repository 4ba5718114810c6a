use serde::{Deserialize, Serialize};

use crate::candidate::FusedResult;

pub const TRUNCATION_MARKER: &str = "\n\n[Contenido truncado...]";

/// The assembled retrieval context for one turn. Invariant: `word_count`
/// never exceeds the configured maximum; when truncation occurred the text
/// ends with [`TRUNCATION_MARKER`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBlock {
	pub text: String,
	pub word_count: usize,
	pub truncated: bool,
}

#[derive(Debug, Clone)]
pub enum Assembled {
	Grounded(ContextBlock),
	/// The context shares no term with the question; the pipeline must
	/// short-circuit to the canned refusal instead of generating.
	Ungrounded,
}

/// Concatenates candidate contents into one labeled block, enforces the word
/// budget, then checks that at least one of the question's terms appears in
/// the block (case-insensitive).
pub fn assemble(results: &[FusedResult], question: &str, max_words: usize) -> Assembled {
	let text = results
		.iter()
		.enumerate()
		.map(|(idx, result)| format!("DOCUMENTO {}:\n{}\n", idx + 1, result.content()))
		.collect::<Vec<_>>()
		.join("\n\n");

	let word_count = count_words(&text);
	let (text, word_count, truncated) = if word_count > max_words {
		(truncate_words(&text, max_words), max_words, true)
	} else {
		(text, word_count, false)
	};

	if !is_grounded(question, &text) {
		return Assembled::Ungrounded;
	}

	Assembled::Grounded(ContextBlock { text, word_count, truncated })
}

pub fn count_words(text: &str) -> usize {
	text.split_whitespace().count()
}

pub fn truncate_words(text: &str, max_words: usize) -> String {
	let kept = text.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ");

	format!("{kept}{TRUNCATION_MARKER}")
}

/// Crude term-overlap heuristic: any single shared whitespace-delimited term
/// grounds the context. The refusal path depends on this exact behavior.
pub fn is_grounded(question: &str, context: &str) -> bool {
	let context = context.to_lowercase();
	let question = question.to_lowercase();

	question.split_whitespace().any(|term| context.contains(term))
}
