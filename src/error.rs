//! Error types of the renderer facade.

use std::path::PathBuf;

use react_engine_conf::SettingsError;
use react_engine_js::EngineError;
use thiserror::Error;

/// Result type for facade operations.
pub type ReactResult<T> = Result<T, ReactError>;

/// Renderer facade errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReactError {
	/// A source path is missing or does not point to a file.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// A validated source file could not be read.
	#[error("failed to read {}: {source}", path.display())]
	SourceRead {
		/// File that failed to read.
		path: PathBuf,
		/// Underlying IO error.
		#[source]
		source: std::io::Error,
	},

	/// Settings could not be assembled.
	#[error(transparent)]
	Settings(#[from] SettingsError),

	/// Props could not be serialized to JSON.
	#[error("props serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The rendering engine failed; the engine's error is kept as is.
	#[error(transparent)]
	Engine(#[from] EngineError),
}

impl ReactError {
	/// Whether this error was raised while constructing the facade.
	pub fn is_configuration(&self) -> bool {
		matches!(
			self,
			Self::Configuration(_) | Self::SourceRead { .. } | Self::Settings(_)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_configuration_error_display() {
		let err = ReactError::Configuration("missing rendering engine source".to_string());
		assert_eq!(
			err.to_string(),
			"configuration error: missing rendering engine source"
		);
		assert!(err.is_configuration());
	}

	#[rstest]
	fn test_engine_error_is_transparent() {
		let err = ReactError::from(EngineError::RenderFailed("ReferenceError: X".to_string()));
		assert_eq!(err.to_string(), "Component rendering failed: ReferenceError: X");
		assert!(!err.is_configuration());
	}

	#[rstest]
	fn test_source_read_display() {
		let err = ReactError::SourceRead {
			path: PathBuf::from("/srv/react.js"),
			source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
		};
		assert_eq!(err.to_string(), "failed to read /srv/react.js: denied");
		assert!(err.is_configuration());
	}
}
