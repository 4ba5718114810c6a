use serde_json::{Value, json};
use tracing::{debug, error, info};
use uuid::Uuid;

use consulta_domain::{
	Citation, ContextBlock, Message, Role,
	citation::collect_citations,
	context::{Assembled, assemble},
};

use crate::{Category, Service, ServiceError, ServiceResult, prompt};

/// Canonical refusal returned whenever the grounding check fails.
pub const REFUSAL: &str = "Lo siento, no tengo información suficiente para responder esa pregunta.";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AskRequest {
	pub category: String,
	pub question: String,
	pub date_from: Option<String>,
	pub date_to: Option<String>,
	pub result_count: Option<u32>,
	pub thread_id: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AskResponse {
	pub thread_id: String,
	pub answer: String,
}

/// One pass of the decide → retrieve → generate pipeline. The machine is
/// acyclic; `Refused` and `Done` are terminal.
enum TurnState {
	Deciding,
	Retrieving { query: String },
	Generating { context: ContextBlock, citations: Vec<Citation> },
	Refused,
	Done { answer: String },
}

impl Service {
	/// Runs one turn for the request's session. The answer is always a
	/// string: a grounded answer, the canonical refusal, or an
	/// `"Error: <cause>"` report; generation faults never propagate.
	pub async fn ask(&self, req: AskRequest) -> ServiceResult<AskResponse> {
		let question = req.question.trim();

		if question.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "question must be non-empty.".to_string(),
			});
		}

		let category = self.category(&req.category)?;
		let thread_id = req
			.thread_id
			.as_deref()
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.map(str::to_string)
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		info!(
			category = %category.name,
			thread_id = %thread_id,
			date_from = ?req.date_from,
			date_to = ?req.date_to,
			"Processing question."
		);

		let session = self.sessions().get_or_create(&thread_id);
		let mut state = session.lock().await;

		state.messages.push(Message::user(question));

		let answer = self.run_turn(category, &state.messages, req.result_count).await;

		state.messages.push(Message::assistant(answer.clone()));

		Ok(AskResponse { thread_id, answer })
	}

	async fn run_turn(
		&self,
		category: &Category,
		history: &[Message],
		k_hint: Option<u32>,
	) -> String {
		// The generation prompt and the grounding check both use the
		// conversation's first user question; later history feeds only the
		// deciding call.
		let question = history
			.iter()
			.find(|message| message.role == Role::User)
			.map(|message| message.content.clone())
			.unwrap_or_default();

		let mut turn = TurnState::Deciding;

		loop {
			turn = match turn {
				TurnState::Deciding => self.decide(history).await,
				TurnState::Retrieving { query } => {
					self.retrieve_stage(category, &query, &question, k_hint).await
				},
				TurnState::Generating { context, citations } => {
					self.generate(&question, &context, &citations).await
				},
				TurnState::Refused => return REFUSAL.to_string(),
				TurnState::Done { answer } => return answer,
			};
		}
	}

	/// Deciding: the model must emit a retrieval directive; it cannot answer
	/// free-form. Always transitions to Retrieving on success.
	async fn decide(&self, history: &[Message]) -> TurnState {
		let wire = wire_messages(history);

		match self.providers.chat.request_retrieval(&self.cfg.providers.chat, &wire).await {
			Ok(directive) => {
				debug!(query = %directive.query, "Retrieval query chosen.");

				TurnState::Retrieving { query: directive.query }
			},
			Err(err) => {
				error!(error = %err, "Chat provider failed while deciding.");

				TurnState::Done { answer: error_answer(err) }
			},
		}
	}

	async fn retrieve_stage(
		&self,
		category: &Category,
		query: &str,
		question: &str,
		k_hint: Option<u32>,
	) -> TurnState {
		let fused = self.retrieve(category, query, k_hint).await;
		let top = self.rerank_top(query, fused).await;
		let citations = collect_citations(&top);

		match assemble(&top, question, self.cfg.context.max_words as usize) {
			Assembled::Grounded(context) => {
				debug!(
					words = context.word_count,
					truncated = context.truncated,
					citations = citations.len(),
					"Context assembled."
				);

				TurnState::Generating { context, citations }
			},
			Assembled::Ungrounded => {
				info!(error = %ServiceError::Ungrounded, "Refusing to answer.");

				TurnState::Refused
			},
		}
	}

	async fn generate(
		&self,
		question: &str,
		context: &ContextBlock,
		citations: &[Citation],
	) -> TurnState {
		let system = prompt::system_prompt(&context.text, citations);
		let wire = vec![
			json!({ "role": Role::System.as_str(), "content": system }),
			json!({ "role": Role::User.as_str(), "content": question }),
		];

		match self.providers.chat.complete(&self.cfg.providers.chat, &wire).await {
			Ok(answer) => TurnState::Done { answer },
			Err(err) => {
				error!(error = %err, "Chat provider failed while generating.");

				TurnState::Done { answer: error_answer(err) }
			},
		}
	}
}

fn error_answer(err: color_eyre::Report) -> String {
	let failure = ServiceError::GenerationFailed { message: err.to_string() };

	format!("Error: {failure}")
}

fn wire_messages(history: &[Message]) -> Vec<Value> {
	history
		.iter()
		.map(|message| json!({ "role": message.role.as_str(), "content": message.content }))
		.collect()
}
