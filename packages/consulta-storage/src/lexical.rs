use sqlx::{
	Row, SqlitePool,
	sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{Result, models::LexicalHit};

/// Read handle over a pre-built SQLite FTS5 index. The `chunks` virtual table
/// carries the indexed `content` column plus an unindexed JSON `metadata`
/// column; writes happen in an out-of-scope ingestion process.
pub struct LexicalIndex {
	pub pool: SqlitePool,
}
impl LexicalIndex {
	pub async fn connect(path: &str) -> Result<Self> {
		let options = SqliteConnectOptions::new().filename(path).read_only(true);
		let pool = SqlitePoolOptions::new().max_connections(4).connect_with(options).await?;

		Ok(Self { pool })
	}

	/// Match-style full-text query. The caller is responsible for stripping
	/// characters the FTS5 query grammar would reject.
	pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<LexicalHit>> {
		let rows = sqlx::query(
			"SELECT content, metadata FROM chunks WHERE content MATCH ? ORDER BY rank LIMIT ?",
		)
		.bind(query)
		.bind(limit as i64)
		.fetch_all(&self.pool)
		.await?;

		let mut out = Vec::with_capacity(rows.len());

		for row in rows {
			let content: String = row.try_get("content")?;
			let metadata: Option<String> = row.try_get("metadata")?;
			let metadata = metadata.as_deref().and_then(|raw| serde_json::from_str(raw).ok());

			out.push(LexicalHit { content, metadata });
		}

		Ok(out)
	}
}
