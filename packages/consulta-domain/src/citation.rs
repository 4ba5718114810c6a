use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::candidate::FusedResult;

/// One citable source reference carried in candidate metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
	pub id_sub: String,
	pub subtipo: String,
}
impl Citation {
	pub fn link(&self) -> String {
		format!("https://simap.pami.org.ar/subtipo_detalle.php?id_sub={}", self.id_sub)
	}
}

/// Collects the unique (id_sub, subtipo) pairs from candidate metadata,
/// preserving first-seen order.
pub fn collect_citations(results: &[FusedResult]) -> Vec<Citation> {
	let mut out: Vec<Citation> = Vec::new();

	for result in results {
		let Some(metadata) = result.candidate.metadata.as_ref() else {
			continue;
		};
		let Some(id_sub) = metadata_field(metadata, "id_sub") else {
			continue;
		};
		let subtipo = metadata_field(metadata, "subtipo").unwrap_or_default();
		let citation = Citation { id_sub, subtipo };

		if !out.contains(&citation) {
			out.push(citation);
		}
	}

	out
}

fn metadata_field(metadata: &Value, key: &str) -> Option<String> {
	match metadata.get(key)? {
		Value::String(text) => {
			let trimmed = text.trim();

			(!trimmed.is_empty()).then(|| trimmed.to_string())
		},
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}
