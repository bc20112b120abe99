//! # react-engine
//!
//! Server-side rendering of React components for CMS templates.
//!
//! A [`React`] facade loads a React build and an application bundle, renders
//! a named component to markup through an embedded JavaScript engine, and
//! wraps that markup in an element carrying `data-react-class` and
//! `data-react-props` so client-side code can hydrate it.
//!
//! ## Feature Flags
//!
//! - `boa` (default) - embedded boa_engine renderer ([`React::new`],
//!   [`React::instance`])
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use react_engine::prelude::*;
//! use serde_json::json;
//!
//! let react = React::new("/var/www/local/js/react.js", "/var/www/local/js/app.js")?;
//!
//! let html = react.render(
//!     "Greeting",
//!     &json!({"name": "Ana"}),
//!     &RenderOptions::new().tag("span").attr("id", "g1"),
//! )?;
//! // <span data-react-class='Greeting' data-react-props='{&quot;name&quot;:&quot;Ana&quot;}' id='g1'>...</span>
//! ```
//!
//! ## Configuration
//!
//! [`React::instance`] reads the `reactengine` module settings (see
//! [`react_engine_conf`]) once, resolves `react_source` and `app_source`
//! against the document root, and keeps the constructed facade for the rest
//! of the process.

pub mod bundle;
pub mod encoding;
pub mod error;
pub mod options;
pub mod react;

pub use bundle::SourceBundle;
pub use error::{ReactError, ReactResult};
pub use options::{DEFAULT_TAG, OptionValue, RenderOptions};
pub use react::{CLASS_ATTR, PROPS_ATTR, React};

pub use react_engine_conf as conf;
pub use react_engine_js as js;
pub use react_engine_js::{EngineError, RenderingEngine, SharedEngine};

/// Commonly used types.
pub mod prelude {
	pub use crate::{
		EngineError, OptionValue, React, ReactError, ReactResult, RenderOptions, RenderingEngine,
		SourceBundle,
	};
	pub use react_engine_conf::{EngineSettings, SettingsBuilder};
}
