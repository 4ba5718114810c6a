use std::time::Duration;

use tokio::time;
use tracing::{debug, warn};

use consulta_domain::{
	Candidate, FusedResult, FusionParams, Origin,
	fusion::{cmp_f32_desc, fuse},
};

use crate::{Category, Service, ServiceError, ServiceResult};

impl Service {
	/// Concurrent lexical/semantic fan-out joined at the fusion step. Either
	/// side failing or timing out degrades to an empty list; the turn always
	/// proceeds with whatever evidence is left.
	pub(crate) async fn retrieve(
		&self,
		category: &Category,
		query: &str,
		k_hint: Option<u32>,
	) -> Vec<FusedResult> {
		let budget = Duration::from_millis(self.cfg.retrieval.timeout_ms);
		let (semantic, lexical) = tokio::join!(
			self.semantic_candidates(category, query, k_hint, budget),
			self.lexical_candidates(category, query, budget),
		);
		let semantic = absorb_retrieval_failure(semantic, Origin::Semantic);
		let lexical = absorb_retrieval_failure(lexical, Origin::Lexical);

		debug!(
			semantic = semantic.len(),
			lexical = lexical.len(),
			"Retrieval fan-out complete; fusing."
		);

		let params = FusionParams {
			rrf_k: self.cfg.fusion.rrf_k,
			dedup_prefix_chars: self.cfg.fusion.dedup_prefix_chars as usize,
			top_n: self.cfg.fusion.top_n as usize,
		};
		let fused = fuse(semantic, lexical, &params);

		if let Some(top) = fused.first() {
			debug!(results = fused.len(), top_sources = %top.source_label(), "Fusion complete.");
		}

		fused
	}

	async fn lexical_candidates(
		&self,
		category: &Category,
		query: &str,
		budget: Duration,
	) -> ServiceResult<Vec<Candidate>> {
		let sanitized = sanitize_match_query(query);
		let limit = self.cfg.retrieval.max_results_lexical;
		let hits = time::timeout(budget, category.lexical.search(&sanitized, limit))
			.await
			.map_err(|_| ServiceError::RetrievalUnavailable {
				origin: Origin::Lexical,
				message: format!("query timed out after {}ms", budget.as_millis()),
			})?
			.map_err(|err| ServiceError::RetrievalUnavailable {
				origin: Origin::Lexical,
				message: err.to_string(),
			})?;

		Ok(hits.into_iter().map(|hit| Candidate::lexical(hit.content, hit.metadata)).collect())
	}

	async fn semantic_candidates(
		&self,
		category: &Category,
		query: &str,
		k_hint: Option<u32>,
		budget: Duration,
	) -> ServiceResult<Vec<Candidate>> {
		let max_k = self.cfg.retrieval.max_results_semantic;
		let k = k_hint.map(|k| k.clamp(1, max_k)).unwrap_or(max_k);
		let texts = [query.to_string()];
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &texts)
			.await
			.map_err(|err| ServiceError::RetrievalUnavailable {
				origin: Origin::Semantic,
				message: err.to_string(),
			})?;
		let Some(vector) = embeddings.into_iter().next() else {
			return Err(ServiceError::RetrievalUnavailable {
				origin: Origin::Semantic,
				message: "embedding provider returned no vectors".to_string(),
			});
		};

		if vector.len() != self.cfg.providers.embedding.dimensions as usize {
			return Err(ServiceError::RetrievalUnavailable {
				origin: Origin::Semantic,
				message: "embedding vector dimension mismatch".to_string(),
			});
		}

		let hits = time::timeout(budget, category.semantic.search(vector, k))
			.await
			.map_err(|_| ServiceError::RetrievalUnavailable {
				origin: Origin::Semantic,
				message: format!("query timed out after {}ms", budget.as_millis()),
			})?
			.map_err(|err| ServiceError::RetrievalUnavailable {
				origin: Origin::Semantic,
				message: err.to_string(),
			})?;

		Ok(hits
			.into_iter()
			.map(|hit| Candidate::semantic(hit.content, hit.score, hit.metadata))
			.collect())
	}

	/// Reranks the fused list through the external relevance model and keeps
	/// the configured top-K. Disabled reranking, short lists, and provider
	/// failures all fall back to the first top-K of the fused order.
	pub(crate) async fn rerank_top(&self, query: &str, fused: Vec<FusedResult>) -> Vec<FusedResult> {
		let top_k = self.cfg.rerank.top_k as usize;

		if !self.cfg.rerank.enabled || fused.len() < 2 {
			return first_top_k(fused, top_k);
		}

		match self.rerank_scores(query, &fused).await {
			Ok(scores) => reorder_by_scores(fused, &scores, top_k),
			Err(err) => {
				warn!(error = %err, "Falling back to fused order for the top results.");

				first_top_k(fused, top_k)
			},
		}
	}

	async fn rerank_scores(&self, query: &str, fused: &[FusedResult]) -> ServiceResult<Vec<f32>> {
		let docs: Vec<String> =
			fused.iter().map(|result| result.content().to_string()).collect();
		let scores = self
			.providers
			.rerank
			.rerank(&self.cfg.providers.rerank, query, &docs)
			.await
			.map_err(|err| ServiceError::RerankUnavailable { message: err.to_string() })?;

		if scores.len() != docs.len() {
			return Err(ServiceError::RerankUnavailable {
				message: "provider returned mismatched score count".to_string(),
			});
		}

		Ok(scores)
	}
}

fn absorb_retrieval_failure(
	outcome: ServiceResult<Vec<Candidate>>,
	origin: Origin,
) -> Vec<Candidate> {
	match outcome {
		Ok(candidates) => candidates,
		Err(err) => {
			warn!(error = %err, origin = origin.as_str(), "Continuing with empty results.");

			Vec::new()
		},
	}
}

fn first_top_k(mut fused: Vec<FusedResult>, top_k: usize) -> Vec<FusedResult> {
	fused.truncate(top_k);
	fused
}

fn reorder_by_scores(fused: Vec<FusedResult>, scores: &[f32], top_k: usize) -> Vec<FusedResult> {
	let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();

	indexed.sort_by(|left, right| cmp_f32_desc(left.1, right.1));

	let mut slots: Vec<Option<FusedResult>> = fused.into_iter().map(Some).collect();

	indexed
		.into_iter()
		.take(top_k)
		.filter_map(|(idx, _)| slots.get_mut(idx).and_then(Option::take))
		.collect()
}

/// Strips every character outside word and whitespace classes so the query
/// cannot violate the FTS5 match grammar.
pub fn sanitize_match_query(query: &str) -> String {
	query
		.chars()
		.filter(|ch| ch.is_alphanumeric() || *ch == '_' || ch.is_whitespace())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fused_fixture(contents: &[&str]) -> Vec<FusedResult> {
		let candidates = contents
			.iter()
			.map(|content| Candidate::semantic(*content, 0.5, None))
			.collect();

		fuse(candidates, Vec::new(), &FusionParams::default())
	}

	#[test]
	fn strips_query_punctuation() {
		assert_eq!(sanitize_match_query("¿qué requisitos hay?"), "qué requisitos hay");
		assert_eq!(sanitize_match_query("insulina (glargina) - 100%"), "insulina glargina  100");
	}

	#[test]
	fn keeps_word_characters() {
		assert_eq!(sanitize_match_query("id_sub 347"), "id_sub 347");
	}

	#[test]
	fn first_top_k_preserves_order() {
		let fused = fused_fixture(&["a", "b", "c", "d", "e"]);
		let top = first_top_k(fused, 3);
		let contents: Vec<&str> = top.iter().map(|result| result.content()).collect();

		assert_eq!(contents, vec!["a", "b", "c"]);
	}

	#[test]
	fn reorder_follows_model_scores_descending() {
		let fused = fused_fixture(&["a", "b", "c", "d"]);
		let top = reorder_by_scores(fused, &[0.1, 0.9, 0.3, 0.7], 3);
		let contents: Vec<&str> = top.iter().map(|result| result.content()).collect();

		assert_eq!(contents, vec!["b", "d", "c"]);
	}

	#[test]
	fn reorder_breaks_score_ties_by_fused_order() {
		let fused = fused_fixture(&["a", "b", "c"]);
		let top = reorder_by_scores(fused, &[0.5, 0.5, 0.5], 2);
		let contents: Vec<&str> = top.iter().map(|result| result.content()).collect();

		assert_eq!(contents, vec!["a", "b"]);
	}
}
