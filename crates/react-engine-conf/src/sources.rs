//! Configuration sources for the layered settings system
//!
//! Each source produces a flat key/value map. Sources are merged in priority
//! order by [`SettingsBuilder`](crate::SettingsBuilder): environment variables >
//! caller-provided stores > TOML files > defaults. Keys are lower-cased on load
//! so `REACT_SOURCE` and `react_source` name the same setting.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::MODULE_ID;

/// Keys whose environment values are parsed as booleans.
const BOOLEAN_KEYS: &[&str] = &["escape_attributes"];

/// A provider of flat engine settings.
pub trait ConfigSource: Send + Sync {
	/// Reads the settings this source currently holds.
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Merge rank; a higher rank overrides a lower one.
	fn priority(&self) -> u8;

	/// Human-readable name used in logs and errors.
	fn description(&self) -> String;
}

/// Failure while reading a settings source.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	/// The backing file could not be read.
	#[error("cannot read settings file: {0}")]
	Io(#[from] std::io::Error),

	/// The content has an unexpected shape.
	#[error("malformed settings: {0}")]
	Parse(String),

	/// The file is not valid TOML.
	#[error("invalid TOML: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value could not be converted to JSON.
	#[error("cannot convert settings value: {0}")]
	Json(#[from] serde_json::Error),
}

/// Settings taken from the process environment.
///
/// Only variables starting with the prefix (`REACT_ENGINE_` by default) are
/// read; the prefix is stripped and the remainder lower-cased.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	/// Default prefix for engine settings in the process environment.
	pub const DEFAULT_PREFIX: &'static str = "REACT_ENGINE_";

	/// Reads variables carrying [`DEFAULT_PREFIX`](Self::DEFAULT_PREFIX).
	///
	/// # Examples
	///
	/// ```
	/// use react_engine_conf::EnvSource;
	///
	/// let source = EnvSource::new();
	/// // Loads REACT_ENGINE_REACT_SOURCE, REACT_ENGINE_APP_SOURCE, ...
	/// ```
	pub fn new() -> Self {
		Self {
			prefix: Self::DEFAULT_PREFIX.to_string(),
		}
	}

	/// Reads variables carrying `prefix` instead.
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();

		// Non-UTF-8 names cannot carry the prefix and are skipped
		for (name, raw) in std::env::vars_os() {
			let Some(key) = name
				.to_str()
				.and_then(|name| name.strip_prefix(&self.prefix))
				.map(str::to_lowercase)
			else {
				continue;
			};
			let raw = raw.into_string().map_err(|_| {
				SourceError::Parse(format!(
					"environment variable {}{} is not valid UTF-8",
					self.prefix,
					key.to_uppercase()
				))
			})?;

			let value = if BOOLEAN_KEYS.contains(&key.as_str()) {
				parse_flag(raw)
			} else {
				Value::String(raw)
			};
			config.insert(key, value);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("environment ({}*)", self.prefix)
	}
}

/// Reads a boolean flag the way shells spell them; anything else stays text.
fn parse_flag(raw: String) -> Value {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Value::Bool(true),
		"" | "0" | "false" | "no" | "off" => Value::Bool(false),
		_ => Value::String(raw),
	}
}

/// Settings kept in a TOML file.
///
/// Reads the `[reactengine]` table of the file. A missing file yields an
/// empty map so an optional config file can always be registered.
pub struct TomlFileSource {
	path: PathBuf,
	table: String,
}

impl TomlFileSource {
	/// Reads the `[reactengine]` table of `path`.
	///
	/// # Examples
	///
	/// ```
	/// use react_engine_conf::TomlFileSource;
	///
	/// let source = TomlFileSource::new("settings.toml");
	/// ```
	pub fn new(path: impl AsRef<Path>) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			table: MODULE_ID.to_string(),
		}
	}

	/// Read settings from a different top-level table.
	pub fn with_table(mut self, table: impl Into<String>) -> Self {
		self.table = table.into();
		self
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.is_file() {
			tracing::debug!(path = %self.path.display(), "settings file absent, skipping");
			return Ok(IndexMap::new());
		}

		let document: toml::Table = toml::from_str(&fs::read_to_string(&self.path)?)?;
		let Some(section) = document.get(&self.table) else {
			return Ok(IndexMap::new());
		};
		let toml::Value::Table(section) = section else {
			return Err(SourceError::Parse(format!(
				"`{}` in {} is not a table",
				self.table,
				self.path.display()
			)));
		};

		section
			.iter()
			.map(|(key, value)| -> Result<_, SourceError> {
				Ok((key.to_lowercase(), serde_json::to_value(value)?))
			})
			.collect()
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("{} [{}]", self.path.display(), self.table)
	}
}

/// Built-in fallback values, overridden by every other source.
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Starts without any fallback values.
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Sets the fallback for `key`.
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into().to_lowercase(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"built-in defaults".to_string()
	}
}

/// In-memory configuration source with a caller-chosen priority.
///
/// Hosts that keep module options in their own store (a database table, an
/// admin form) copy them into a `MemorySource` before building settings.
pub struct MemorySource {
	values: IndexMap<String, Value>,
	priority: u8,
	label: String,
}

impl MemorySource {
	/// Create an empty in-memory source.
	///
	/// # Examples
	///
	/// ```
	/// use react_engine_conf::MemorySource;
	/// use serde_json::json;
	///
	/// let source = MemorySource::new(75)
	///     .with_value("REACT_SOURCE", json!("/local/js/react.js"));
	/// ```
	pub fn new(priority: u8) -> Self {
		Self {
			values: IndexMap::new(),
			priority,
			label: "memory".to_string(),
		}
	}

	/// Add a value; the key is lower-cased.
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into().to_lowercase(), value);
		self
	}

	/// Name shown by [`ConfigSource::description`].
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}
}

impl ConfigSource for MemorySource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		self.priority
	}

	fn description(&self) -> String {
		format!("{} (in memory)", self.label)
	}
}
