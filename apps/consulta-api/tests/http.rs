use std::sync::Arc;

use axum::{
	body::{Body, to_bytes},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use consulta_api::{routes, state::AppState};
use consulta_config::{ChatProviderConfig, EmbeddingProviderConfig, RerankProviderConfig};
use consulta_service::{
	BoxFuture, Category, ChatProvider, EmbeddingProvider, Providers, REFUSAL, RerankProvider,
	RetrievalDirective, SemanticSearcher, Service,
};
use consulta_storage::models::SemanticHit;
use consulta_testkit::{TEST_VECTOR_DIM, memory_lexical_index, test_config};

struct MockEmbedding;
impl EmbeddingProvider for MockEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		let vectors = vec![vec![0.1; TEST_VECTOR_DIM as usize]; texts.len()];

		Box::pin(async move { Ok(vectors) })
	}
}

struct NoRerank;
impl RerankProvider for NoRerank {
	fn rerank<'a>(
		&'a self,
		_cfg: &'a RerankProviderConfig,
		_query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		let scores = vec![0.0; docs.len()];

		Box::pin(async move { Ok(scores) })
	}
}

struct StaticChat {
	query: String,
	answer: String,
}
impl ChatProvider for StaticChat {
	fn complete<'a>(
		&'a self,
		_cfg: &'a ChatProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		let answer = self.answer.clone();

		Box::pin(async move { Ok(answer) })
	}

	fn request_retrieval<'a>(
		&'a self,
		_cfg: &'a ChatProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<RetrievalDirective>> {
		let query = self.query.clone();

		Box::pin(async move { Ok(RetrievalDirective { query }) })
	}
}

struct EmptySemantic;
impl SemanticSearcher for EmptySemantic {
	fn search<'a>(
		&'a self,
		_vector: Vec<f32>,
		_k: u32,
	) -> BoxFuture<'a, consulta_storage::Result<Vec<SemanticHit>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}
}

async fn test_state(directive_query: &str, answer: &str) -> AppState {
	let lexical = memory_lexical_index(&[("los requisitos son DNI y credencial", None)])
		.await
		.expect("lexical fixture failed");
	let category = Category {
		name: "servicios".to_string(),
		lexical: Arc::new(lexical),
		semantic: Arc::new(EmptySemantic),
	};
	let providers = Providers::new(
		Arc::new(MockEmbedding),
		Arc::new(NoRerank),
		Arc::new(StaticChat { query: directive_query.to_string(), answer: answer.to_string() }),
	);
	let service = Service::with_providers(test_config(&["servicios"]), vec![category], providers);

	AppState::from_service(Arc::new(service)).expect("state build failed")
}

async fn body_text(response: axum::response::Response) -> String {
	let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body read failed");

	String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

#[tokio::test]
async fn health_returns_ok() {
	let app = routes::router(test_state("requisitos", "ok").await);
	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn category_page_renders_form() {
	let app = routes::router(test_state("requisitos", "ok").await);
	let response = app
		.oneshot(Request::builder().uri("/consultas/servicios").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_text(response).await;

	assert!(body.contains("<form method=\"post\" action=\"/consultas/servicios\">"));
	assert!(body.contains("name=\"pregunta\""));
}

#[tokio::test]
async fn unknown_category_is_not_found() {
	let app = routes::router(test_state("requisitos", "ok").await);
	let response = app
		.oneshot(Request::builder().uri("/consultas/desconocida").body(Body::empty()).unwrap())
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn question_renders_grounded_answer() {
	let app = routes::router(test_state("requisitos", "Respuesta de prueba.").await);
	let request = Request::builder()
		.method("POST")
		.uri("/consultas/servicios")
		.header("content-type", "application/x-www-form-urlencoded")
		.body(Body::from("pregunta=requisitos&fecha_desde=2024-01-01&fecha_hasta=2024-12-31&k=10"))
		.unwrap();
	let response = app.oneshot(request).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_text(response).await;

	assert!(body.contains("Respuesta de prueba."));
	assert!(body.contains("name=\"thread_id\""));
}

#[tokio::test]
async fn unanswerable_question_renders_refusal() {
	let app = routes::router(test_state("inexistente", "no debería generarse").await);
	let request = Request::builder()
		.method("POST")
		.uri("/consultas/servicios")
		.header("content-type", "application/x-www-form-urlencoded")
		.body(Body::from("pregunta=anteojos"))
		.unwrap();
	let response = app.oneshot(request).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_text(response).await;

	assert!(body.contains(REFUSAL));
}

#[tokio::test]
async fn empty_question_renders_page_error() {
	let app = routes::router(test_state("requisitos", "ok").await);
	let request = Request::builder()
		.method("POST")
		.uri("/consultas/servicios")
		.header("content-type", "application/x-www-form-urlencoded")
		.body(Body::from("pregunta="))
		.unwrap();
	let response = app.oneshot(request).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);

	let body = body_text(response).await;

	assert!(body.contains("Error al procesar la pregunta:"));
}
