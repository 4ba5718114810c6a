use std::collections::HashMap;

use qdrant_client::qdrant::{Query, QueryPointsBuilder, Value, value::Kind};
use serde_json::Map;

use crate::{Result, models::SemanticHit};

/// Read handle over the pre-built Qdrant vector index. One store serves every
/// document category; each category queries its own collection.
pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &consulta_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, vector_dim: cfg.vector_dim })
	}

	pub async fn search(
		&self,
		collection: &str,
		vector: Vec<f32>,
		k: u32,
	) -> Result<Vec<SemanticHit>> {
		let request = QueryPointsBuilder::new(collection)
			.query(Query::new_nearest(vector))
			.with_payload(true)
			.limit(k as u64);
		let response = self.client.query(request).await?;

		let mut out = Vec::with_capacity(response.result.len());

		for point in response.result {
			// Points without a content payload cannot be cited or assembled;
			// they are dropped from the result sequence.
			let Some(content) = payload_text(&point.payload, "content") else {
				continue;
			};

			out.push(SemanticHit {
				content,
				score: point.score,
				metadata: payload_metadata(&point.payload),
			});
		}

		Ok(out)
	}
}

fn payload_text(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.to_string()),
		Some(Kind::IntegerValue(value)) => Some(value.to_string()),
		_ => None,
	}
}

fn payload_metadata(payload: &HashMap<String, Value>) -> Option<serde_json::Value> {
	let mut fields = Map::new();

	for key in ["id_sub", "subtipo"] {
		if let Some(value) = payload_text(payload, key) {
			fields.insert(key.to_string(), serde_json::Value::String(value));
		}
	}

	if fields.is_empty() { None } else { Some(serde_json::Value::Object(fields)) }
}
