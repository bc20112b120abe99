//! Loading of the rendering library and application sources.

use std::fs;
use std::path::Path;

use crate::error::{ReactError, ReactResult};

/// The two source texts the engine is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBundle {
	react: String,
	app: String,
}

impl SourceBundle {
	/// Wraps already loaded sources.
	pub fn new(react: impl Into<String>, app: impl Into<String>) -> Self {
		Self {
			react: react.into(),
			app: app.into(),
		}
	}

	/// Validates both paths and reads the files.
	///
	/// The rendering library path must name an existing file. The
	/// application path may be empty, which yields an empty bundle; otherwise
	/// it must name an existing file too.
	///
	/// # Errors
	///
	/// [`ReactError::Configuration`] when a path is missing or not a file,
	/// [`ReactError::SourceRead`] when a file cannot be read.
	pub fn load(react_path: &Path, app_path: &Path) -> ReactResult<Self> {
		if react_path.as_os_str().is_empty() || !react_path.is_file() {
			return Err(ReactError::Configuration(format!(
				"missing rendering engine source: could not find `{}`",
				react_path.display()
			)));
		}

		let has_app = !app_path.as_os_str().is_empty();
		if has_app && !app_path.is_file() {
			return Err(ReactError::Configuration(format!(
				"missing application source: could not find `{}`",
				app_path.display()
			)));
		}

		let react = read_source(react_path)?;
		let app = if has_app {
			read_source(app_path)?
		} else {
			String::new()
		};

		tracing::debug!(
			react_path = %react_path.display(),
			app_path = %app_path.display(),
			react_bytes = react.len(),
			app_bytes = app.len(),
			"loaded rendering sources"
		);

		Ok(Self { react, app })
	}

	/// Rendering library source.
	pub fn react(&self) -> &str {
		&self.react
	}

	/// Application bundle source; empty when none was configured.
	pub fn app(&self) -> &str {
		&self.app
	}
}

fn read_source(path: &Path) -> ReactResult<String> {
	fs::read_to_string(path).map_err(|source| ReactError::SourceRead {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use std::path::PathBuf;
	use tempfile::TempDir;

	#[fixture]
	fn site() -> TempDir {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join("react.js"), "var React = {};").unwrap();
		fs::write(dir.path().join("app.js"), "var App = {};").unwrap();
		dir
	}

	#[rstest]
	fn test_load_both_sources(site: TempDir) {
		let bundle = SourceBundle::load(&site.path().join("react.js"), &site.path().join("app.js"))
			.unwrap();
		assert_eq!(bundle.react(), "var React = {};");
		assert_eq!(bundle.app(), "var App = {};");
	}

	#[rstest]
	fn test_new_wraps_loaded_text(site: TempDir) {
		let loaded = SourceBundle::load(&site.path().join("react.js"), &site.path().join("app.js"))
			.unwrap();

		let bundle = SourceBundle::new("var React = {};", String::from("var App = {};"));

		assert_eq!(bundle.react(), "var React = {};");
		assert_eq!(bundle.app(), "var App = {};");
		assert_eq!(bundle, loaded);
	}

	#[rstest]
	fn test_empty_app_path_yields_empty_app(site: TempDir) {
		let bundle = SourceBundle::load(&site.path().join("react.js"), Path::new("")).unwrap();
		assert_eq!(bundle.app(), "");
	}

	#[rstest]
	fn test_empty_react_path_is_configuration_error() {
		let err = SourceBundle::load(Path::new(""), Path::new("")).unwrap_err();
		assert!(matches!(err, ReactError::Configuration(ref m) if m.contains("rendering engine")));
	}

	#[rstest]
	fn test_missing_react_file(site: TempDir) {
		let err = SourceBundle::load(&site.path().join("nope.js"), Path::new("")).unwrap_err();
		assert!(matches!(err, ReactError::Configuration(ref m) if m.contains("rendering engine")));
	}

	#[rstest]
	fn test_directory_is_not_a_source(site: TempDir) {
		let err = SourceBundle::load(site.path(), Path::new("")).unwrap_err();
		assert!(err.is_configuration());
	}

	#[rstest]
	fn test_missing_app_file(site: TempDir) {
		let missing: PathBuf = site.path().join("missing-app.js");
		let err = SourceBundle::load(&site.path().join("react.js"), &missing).unwrap_err();
		assert!(matches!(err, ReactError::Configuration(ref m) if m.contains("application source")));
	}
}
