//! Engine settings and the builder that merges configuration sources.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError};

/// Environment variable consulted when no document root is configured.
pub const DOCUMENT_ROOT_ENV: &str = "DOCUMENT_ROOT";

/// Errors produced while assembling [`EngineSettings`].
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// A source failed to load.
	#[error("failed to load {source_name}: {error}")]
	Source {
		/// Description of the failing source.
		source_name: String,
		/// Underlying error.
		#[source]
		error: SourceError,
	},

	/// The merged map does not describe valid settings.
	#[error("invalid settings: {0}")]
	Invalid(#[from] serde_json::Error),
}

/// Settings of the renderer facade, stored under the `reactengine` module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
	/// Rendering library source, relative to the document root.
	pub react_source: String,
	/// Application bundle, relative to the document root. May be empty.
	pub app_source: String,
	/// Document root the relative paths are resolved against.
	pub document_root: Option<PathBuf>,
	/// Entity-encode pass-through attribute values.
	pub escape_attributes: bool,
}

impl EngineSettings {
	/// Document root from the settings, falling back to `DOCUMENT_ROOT`.
	pub fn effective_document_root(&self) -> Option<PathBuf> {
		self.document_root.clone().or_else(|| {
			std::env::var_os(DOCUMENT_ROOT_ENV)
				.filter(|value| !value.is_empty())
				.map(PathBuf::from)
		})
	}

	/// Absolute path of the rendering library source.
	pub fn react_source_path(&self) -> PathBuf {
		resolve_source_path(
			self.effective_document_root().as_deref(),
			&self.react_source,
		)
	}

	/// Absolute path of the application bundle; empty when unset.
	pub fn app_source_path(&self) -> PathBuf {
		resolve_source_path(self.effective_document_root().as_deref(), &self.app_source)
	}
}

/// Resolves a configured relative path against the document root.
///
/// Trailing `/` and `\` are trimmed from the root before the relative value
/// is appended. An empty relative value stays empty.
///
/// # Examples
///
/// ```
/// use react_engine_conf::resolve_source_path;
/// use std::path::{Path, PathBuf};
///
/// let path = resolve_source_path(Some(Path::new("/var/www/")), "/local/js/react.js");
/// assert_eq!(path, PathBuf::from("/var/www/local/js/react.js"));
///
/// assert_eq!(resolve_source_path(Some(Path::new("/var/www")), ""), PathBuf::new());
/// ```
pub fn resolve_source_path(document_root: Option<&Path>, relative: &str) -> PathBuf {
	if relative.is_empty() {
		return PathBuf::new();
	}

	let Some(root) = document_root else {
		return PathBuf::from(relative);
	};

	let root = root.to_string_lossy();
	let root = root.trim_end_matches(['/', '\\']);
	if relative.starts_with(['/', '\\']) {
		PathBuf::from(format!("{root}{relative}"))
	} else {
		PathBuf::from(format!("{root}/{relative}"))
	}
}

/// Merges configuration sources into [`EngineSettings`].
///
/// Sources are applied in ascending priority; on equal priority the one
/// added later wins.
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder preloaded with the defaults and the process environment.
	pub fn with_standard_sources() -> Self {
		Self::new()
			.add_source(
				DefaultSource::new()
					.with_value("react_source", Value::String(String::new()))
					.with_value("app_source", Value::String(String::new()))
					.with_value("escape_attributes", Value::Bool(false)),
			)
			.add_source(EnvSource::new())
	}

	/// Registers a source.
	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Loads every source and merges them by priority.
	pub fn build_map(&self) -> Result<IndexMap<String, Value>, SettingsError> {
		let mut ordered: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
		ordered.sort_by_key(|source| source.priority());

		let mut merged = IndexMap::new();
		for source in ordered {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded settings source"
			);
			merged.extend(values);
		}
		Ok(merged)
	}

	/// Loads, merges and deserializes the settings.
	pub fn build(&self) -> Result<EngineSettings, SettingsError> {
		let merged = self.build_map()?;
		let object: serde_json::Map<String, Value> = merged.into_iter().collect();
		Ok(serde_json::from_value(Value::Object(object))?)
	}
}
