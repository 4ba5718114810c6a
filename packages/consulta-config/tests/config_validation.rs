use toml::Value;

use consulta_config::{Config, Error, validate};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn parse(value: Value) -> Config {
	let raw = toml::to_string(&value).expect("Failed to render mutated config.");

	toml::from_str(&raw).expect("Failed to decode mutated config.")
}

fn table_mut<'a>(value: &'a mut Value, path: &[&str]) -> &'a mut toml::Table {
	let mut current = value;

	for segment in path {
		current = current
			.as_table_mut()
			.and_then(|table| table.get_mut(*segment))
			.unwrap_or_else(|| panic!("Template config must include [{segment}]."));
	}

	current.as_table_mut().expect("Config path must be a table.")
}

#[test]
fn sample_config_is_valid() {
	let cfg = sample_config();

	validate(&cfg).expect("sample config must validate");
	assert_eq!(cfg.categories.len(), 2);
	assert_eq!(cfg.fusion.rrf_k, 60);
}

#[test]
fn rejects_missing_chat_api_key() {
	let mut value = sample_value();

	table_mut(&mut value, &["providers", "chat"])
		.insert("api_key".to_string(), Value::String("  ".to_string()));

	let err = validate(&parse(value)).expect_err("must reject blank chat api_key");

	assert!(matches!(err, Error::Validation { .. }));
	assert!(err.to_string().contains("chat api_key"));
}

#[test]
fn rejects_dimension_mismatch_with_vector_store() {
	let mut value = sample_value();

	table_mut(&mut value, &["providers", "embedding"])
		.insert("dimensions".to_string(), Value::Integer(768));

	let err = validate(&parse(value)).expect_err("must reject mismatched dimensions");

	assert!(err.to_string().contains("vector_dim"));
}

#[test]
fn rejects_rerank_enabled_without_credential() {
	let mut value = sample_value();

	table_mut(&mut value, &["rerank"]).insert("enabled".to_string(), Value::Boolean(true));
	table_mut(&mut value, &["providers", "rerank"])
		.insert("api_key".to_string(), Value::String(String::new()));

	let err = validate(&parse(value)).expect_err("must reject rerank without credential");

	assert!(err.to_string().contains("rerank.api_key"));
}

#[test]
fn accepts_rerank_enabled_with_credential() {
	let mut value = sample_value();

	table_mut(&mut value, &["rerank"]).insert("enabled".to_string(), Value::Boolean(true));

	validate(&parse(value)).expect("rerank with credential must validate");
}

#[test]
fn rejects_empty_categories() {
	let mut value = sample_value();

	value
		.as_table_mut()
		.expect("Template config must be a table.")
		.insert("categories".to_string(), Value::Array(Vec::new()));

	let err = validate(&parse(value)).expect_err("must reject empty categories");

	assert!(err.to_string().contains("categories"));
}

#[test]
fn rejects_duplicated_category_names() {
	let mut value = sample_value();
	let root = value.as_table_mut().expect("Template config must be a table.");
	let categories =
		root.get_mut("categories").and_then(Value::as_array_mut).expect("categories array");
	let first = categories.first().cloned().expect("at least one category");

	categories.push(first);

	let err = validate(&parse(value)).expect_err("must reject duplicate category names");

	assert!(err.to_string().contains("duplicated"));
}

#[test]
fn rejects_zero_fusion_top_n() {
	let mut value = sample_value();

	table_mut(&mut value, &["fusion"]).insert("top_n".to_string(), Value::Integer(0));

	let err = validate(&parse(value)).expect_err("must reject zero top_n");

	assert!(err.to_string().contains("fusion.top_n"));
}

#[test]
fn rejects_zero_context_budget() {
	let mut value = sample_value();

	table_mut(&mut value, &["context"]).insert("max_words".to_string(), Value::Integer(0));

	let err = validate(&parse(value)).expect_err("must reject zero max_words");

	assert!(err.to_string().contains("context.max_words"));
}

#[test]
fn rejects_zero_session_capacity() {
	let mut value = sample_value();

	table_mut(&mut value, &["session"]).insert("max_sessions".to_string(), Value::Integer(0));

	let err = validate(&parse(value)).expect_err("must reject zero session capacity");

	assert!(err.to_string().contains("session.max_sessions"));
}
