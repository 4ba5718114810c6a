use sqlx::sqlite::SqlitePoolOptions;

use consulta_storage::lexical::LexicalIndex;

async fn seeded_index(rows: &[(&str, Option<&str>)]) -> LexicalIndex {
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.expect("connect failed");

	sqlx::query("CREATE VIRTUAL TABLE chunks USING fts5(content, metadata UNINDEXED)")
		.execute(&pool)
		.await
		.expect("schema failed");

	for &(content, metadata) in rows {
		sqlx::query("INSERT INTO chunks (content, metadata) VALUES (?, ?)")
			.bind(content)
			.bind(metadata)
			.execute(&pool)
			.await
			.expect("insert failed");
	}

	LexicalIndex { pool }
}

#[tokio::test]
async fn matches_indexed_terms() {
	let index = seeded_index(&[
		("Para el trámite se requiere DNI, credencial y receta.", None),
		("Los traslados programados requieren orden médica.", None),
	])
	.await;

	let hits = index.search("credencial", 10).await.expect("search failed");

	assert_eq!(hits.len(), 1);
	assert!(hits[0].content.contains("credencial"));
	assert!(hits[0].metadata.is_none());
}

#[tokio::test]
async fn applies_result_limit() {
	let index = seeded_index(&[
		("requisitos de insulina", None),
		("requisitos de traslado", None),
		("requisitos de audífonos", None),
	])
	.await;

	let hits = index.search("requisitos", 2).await.expect("search failed");

	assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn parses_metadata_json() {
	let index = seeded_index(&[(
		"Traslados programados para afiliados.",
		Some(r#"{"id_sub": "347", "subtipo": "Traslados Programados"}"#),
	)])
	.await;

	let hits = index.search("traslados", 10).await.expect("search failed");
	let metadata = hits[0].metadata.as_ref().expect("metadata missing");

	assert_eq!(metadata.get("id_sub").and_then(|v| v.as_str()), Some("347"));
}

#[tokio::test]
async fn malformed_query_is_an_error() {
	let index = seeded_index(&[("contenido", None)]).await;

	// Unbalanced quotes violate the FTS5 query grammar; the adapter layer is
	// responsible for degrading this to an empty result.
	assert!(index.search("\"sin cerrar", 10).await.is_err());
}
