use std::{cmp::Ordering, collections::HashMap};

use crate::candidate::{Candidate, FusedResult, Origin};

#[derive(Debug, Clone, Copy)]
pub struct FusionParams {
	/// RRF smoothing constant; each candidate at 1-based rank `r` contributes
	/// `1 / (r + rrf_k)`.
	pub rrf_k: u32,
	/// Content-prefix length used as the deduplication identity.
	pub dedup_prefix_chars: usize,
	/// Maximum number of fused results returned.
	pub top_n: usize,
}
impl Default for FusionParams {
	fn default() -> Self {
		Self { rrf_k: 60, dedup_prefix_chars: 150, top_n: 150 }
	}
}

struct FusionEntry {
	candidate: Candidate,
	rrf_score: f32,
	sources: Vec<Origin>,
}

/// Reciprocal Rank Fusion of the semantic and lexical result lists.
///
/// The semantic list is processed first; a candidate whose content-prefix key
/// appears in both lists has its contributions summed and both origins
/// recorded. Scores are normalized by the batch maximum, the output is sorted
/// descending, and ties keep insertion order (stable sort), which makes the
/// function deterministic for identical inputs.
pub fn fuse(
	semantic: Vec<Candidate>,
	lexical: Vec<Candidate>,
	params: &FusionParams,
) -> Vec<FusedResult> {
	let mut entries: Vec<FusionEntry> = Vec::new();
	let mut by_key: HashMap<String, usize> = HashMap::new();

	for list in [semantic, lexical] {
		for (idx, candidate) in list.into_iter().enumerate() {
			let rank = idx + 1;
			let contribution = 1.0 / (rank as f32 + params.rrf_k as f32);
			let key = prefix_key(&candidate.content, params.dedup_prefix_chars);

			match by_key.get(&key) {
				Some(&slot) => {
					let entry = &mut entries[slot];

					entry.rrf_score += contribution;

					if !entry.sources.contains(&candidate.origin) {
						entry.sources.push(candidate.origin);
					}
				},
				None => {
					by_key.insert(key, entries.len());
					entries.push(FusionEntry {
						sources: vec![candidate.origin],
						candidate,
						rrf_score: contribution,
					});
				},
			}
		}
	}

	entries.sort_by(|left, right| cmp_f32_desc(left.rrf_score, right.rrf_score));

	let max_score = entries.first().map(|entry| entry.rrf_score).unwrap_or(1.0);

	entries
		.into_iter()
		.take(params.top_n)
		.map(|entry| FusedResult {
			candidate: entry.candidate,
			fusion_score: entry.rrf_score / max_score,
			sources: entry.sources,
		})
		.collect()
}

pub fn prefix_key(content: &str, prefix_chars: usize) -> String {
	content.chars().take(prefix_chars).collect()
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
