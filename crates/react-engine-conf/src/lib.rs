//! # react-engine-conf
//!
//! Layered settings for the react-engine renderer facade.
//!
//! The facade needs two paths, the rendering library source and the
//! application bundle, both stored relative to the site document root under
//! the `reactengine` module namespace. This crate collects them from several
//! sources and resolves them to absolute paths.
//!
//! ## Example
//!
//! ```no_run
//! use react_engine_conf::{SettingsBuilder, TomlFileSource};
//!
//! let settings = SettingsBuilder::with_standard_sources()
//!     .add_source(TomlFileSource::new("settings.toml"))
//!     .build()?;
//!
//! println!("{}", settings.react_source_path().display());
//! # Ok::<(), react_engine_conf::SettingsError>(())
//! ```

pub mod settings;
pub mod sources;

pub use settings::{
	DOCUMENT_ROOT_ENV, EngineSettings, SettingsBuilder, SettingsError, resolve_source_path,
};
pub use sources::{
	ConfigSource, DefaultSource, EnvSource, MemorySource, SourceError, TomlFileSource,
};

/// Module namespace the engine settings are stored under.
pub const MODULE_ID: &str = "reactengine";
