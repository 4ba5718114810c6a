use axum::{
	Form, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{Html, IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use consulta_service::{AskRequest, ServiceError};

use crate::state::AppState;

const DEFAULT_FECHA_DESDE: &str = "2024-01-01";
const DEFAULT_FECHA_HASTA: &str = "2024-12-31";
const DEFAULT_K: u32 = 50;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/consultas/{category}", get(consulta_page).post(consulta))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct ConsultaForm {
	pub pregunta: String,
	#[serde(default)]
	pub fecha_desde: Option<String>,
	#[serde(default)]
	pub fecha_hasta: Option<String>,
	#[serde(default)]
	pub k: Option<u32>,
	#[serde(default)]
	pub thread_id: Option<String>,
}

struct PageData<'a> {
	category: &'a str,
	pregunta: &'a str,
	fecha_desde: &'a str,
	fecha_hasta: &'a str,
	k: u32,
	thread_id: Option<&'a str>,
	resultado: &'a str,
}
impl<'a> PageData<'a> {
	fn empty(category: &'a str) -> Self {
		Self {
			category,
			pregunta: "",
			fecha_desde: DEFAULT_FECHA_DESDE,
			fecha_hasta: DEFAULT_FECHA_HASTA,
			k: DEFAULT_K,
			thread_id: None,
			resultado: "",
		}
	}
}

async fn consulta_page(
	State(state): State<AppState>,
	Path(category): Path<String>,
) -> Result<Html<String>, ApiError> {
	ensure_category(&state, &category)?;

	render(&state, PageData::empty(&category))
}

async fn consulta(
	State(state): State<AppState>,
	Path(category): Path<String>,
	Form(form): Form<ConsultaForm>,
) -> Result<Html<String>, ApiError> {
	ensure_category(&state, &category)?;

	let request = AskRequest {
		category: category.clone(),
		question: form.pregunta.clone(),
		date_from: form.fecha_desde.clone(),
		date_to: form.fecha_hasta.clone(),
		result_count: form.k,
		thread_id: form.thread_id.clone(),
	};
	let (resultado, thread_id) = match state.service.ask(request).await {
		Ok(response) => (response.answer, Some(response.thread_id)),
		Err(err) => {
			tracing::error!(error = %err, category = %category, "Question processing failed.");

			(format!("Error al procesar la pregunta: {err}"), form.thread_id.clone())
		},
	};

	render(
		&state,
		PageData {
			category: &category,
			pregunta: &form.pregunta,
			fecha_desde: form.fecha_desde.as_deref().unwrap_or(DEFAULT_FECHA_DESDE),
			fecha_hasta: form.fecha_hasta.as_deref().unwrap_or(DEFAULT_FECHA_HASTA),
			k: form.k.unwrap_or(DEFAULT_K),
			thread_id: thread_id.as_deref(),
			resultado: &resultado,
		},
	)
}

fn ensure_category(state: &AppState, category: &str) -> Result<(), ApiError> {
	if state.service.has_category(category) {
		return Ok(());
	}

	let err = ServiceError::UnknownCategory { name: category.to_string() };

	Err(json_error(StatusCode::NOT_FOUND, "unknown_category", err.to_string()))
}

fn render(state: &AppState, data: PageData<'_>) -> Result<Html<String>, ApiError> {
	let body = state
		.pages
		.render(
			"consulta",
			&json!({
				"category": data.category,
				"pregunta": data.pregunta,
				"fecha_desde": data.fecha_desde,
				"fecha_hasta": data.fecha_hasta,
				"k": data.k,
				"thread_id": data.thread_id,
				"resultado": data.resultado,
			}),
		)
		.map_err(|err| {
			json_error(StatusCode::INTERNAL_SERVER_ERROR, "render_failed", err.to_string())
		})?;

	Ok(Html(body))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into() }
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, axum::Json(body)).into_response()
	}
}
