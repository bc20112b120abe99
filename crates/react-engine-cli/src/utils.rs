//! Argument helpers for the react-engine CLI.

use std::path::Path;

use react_engine::conf::{MemorySource, SettingsBuilder, TomlFileSource};
use serde_json::Value;

/// Priority of settings given on the command line; above the environment.
const FLAG_PRIORITY: u8 = 110;

/// Parses a `key=value` attribute argument.
///
/// The value may contain further `=` characters; the key may not be empty.
pub(crate) fn parse_attribute(input: &str) -> Result<(String, String), String> {
	let (key, value) = input
		.split_once('=')
		.ok_or_else(|| format!("invalid attribute `{input}`: expected key=value"))?;
	let key = key.trim();
	if key.is_empty() {
		return Err(format!("invalid attribute `{input}`: empty name"));
	}
	Ok((key.to_string(), value.to_string()))
}

/// Reads props from the `--props` text or the `--props-file` file.
///
/// No props at all means `null`.
pub(crate) fn load_props(inline: Option<&str>, file: Option<&Path>) -> Result<Value, String> {
	let text = match (inline, file) {
		(Some(_), Some(_)) => return Err("use either --props or --props-file, not both".into()),
		(Some(text), None) => text.to_string(),
		(None, Some(path)) => std::fs::read_to_string(path)
			.map_err(|e| format!("failed to read {}: {}", path.display(), e))?,
		(None, None) => return Ok(Value::Null),
	};
	serde_json::from_str(&text).map_err(|e| format!("props are not valid JSON: {e}"))
}

/// Assembles the settings sources: defaults, environment, optional TOML
/// file, then explicit flags.
///
/// A `--config` path that does not name a file is an error.
pub(crate) fn settings_builder(
	config: Option<&Path>,
	document_root: Option<&Path>,
) -> Result<SettingsBuilder, String> {
	let mut builder = SettingsBuilder::with_standard_sources();
	if let Some(path) = config {
		if !path.is_file() {
			return Err(format!("config file not found: {}", path.display()));
		}
		builder = builder.add_source(TomlFileSource::new(path));
	}
	if let Some(root) = document_root {
		builder = builder.add_source(
			MemorySource::new(FLAG_PRIORITY)
				.with_label("command line")
				.with_value("document_root", Value::String(root.to_string_lossy().into_owned())),
		);
	}
	Ok(builder)
}
