use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// The structured retrieval request the model must emit while deciding.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RetrievalDirective {
	pub query: String,
}

const RETRIEVE_TOOL_NAME: &str = "retrieve";

/// Plain chat completion; returns the assistant message content.
pub async fn complete(cfg: &consulta_config::ChatProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_content(json)
}

/// Chat completion with the `retrieve` tool pinned via `tool_choice`, so the
/// model cannot answer free-form; it must return a retrieval query derived
/// from the conversation.
pub async fn request_retrieval(
	cfg: &consulta_config::ChatProviderConfig,
	messages: &[Value],
) -> Result<RetrievalDirective> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	for _ in 0..3 {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"messages": messages,
			"tools": [retrieve_tool_schema()],
			"tool_choice": {
				"type": "function",
				"function": { "name": RETRIEVE_TOOL_NAME },
			},
		});
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;
		if let Ok(directive) = parse_retrieval_directive(json) {
			return Ok(directive);
		}
	}

	Err(eyre::eyre!("Chat response did not contain a retrieval tool call."))
}

fn retrieve_tool_schema() -> Value {
	serde_json::json!({
		"type": "function",
		"function": {
			"name": RETRIEVE_TOOL_NAME,
			"description": "Recupera documentos relevantes de la base de conocimiento.",
			"parameters": {
				"type": "object",
				"properties": {
					"query": {
						"type": "string",
						"description": "Consulta de búsqueda derivada de la conversación.",
					},
				},
				"required": ["query"],
			},
		},
	})
}

fn parse_completion_content(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(|content| content.to_string())
		.ok_or_else(|| eyre::eyre!("Chat response is missing message content."))
}

fn parse_retrieval_directive(json: Value) -> Result<RetrievalDirective> {
	let arguments = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("tool_calls"))
		.and_then(|calls| calls.as_array())
		.and_then(|calls| calls.first())
		.and_then(|call| call.get("function"))
		.and_then(|function| function.get("arguments"))
		.ok_or_else(|| eyre::eyre!("Chat response is missing tool call arguments."))?;

	let parsed: Value = match arguments {
		Value::String(raw) => serde_json::from_str(raw)
			.map_err(|_| eyre::eyre!("Tool call arguments are not valid JSON."))?,
		other => other.clone(),
	};
	let query = parsed
		.get("query")
		.and_then(|v| v.as_str())
		.map(|query| query.trim().to_string())
		.filter(|query| !query.is_empty())
		.ok_or_else(|| eyre::eyre!("Tool call arguments are missing a query."))?;

	Ok(RetrievalDirective { query })
}
