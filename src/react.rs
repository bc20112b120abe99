//! The renderer facade.
//!
//! [`React`] owns the loaded sources and the rendering engine and turns a
//! component name, its props and [`RenderOptions`] into a hydration-ready
//! HTML fragment:
//!
//! ```text
//! <div data-react-class='Greeting' data-react-props='{&quot;name&quot;:&quot;Ana&quot;}' id='g1'><h1>Hello Ana</h1></div>
//! ```
//!
//! Hosts either construct a `React` at startup and pass it around, or use the
//! process-wide instance behind [`React::instance`].

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use react_engine_conf::EngineSettings;
#[cfg(feature = "boa")]
use react_engine_conf::SettingsBuilder;
use react_engine_js::{EngineError, RenderingEngine, SharedEngine};
use serde::Serialize;

use crate::bundle::SourceBundle;
use crate::encoding::{encode_props, html_entities};
use crate::error::ReactResult;
use crate::options::{OptionValue, RenderOptions};

/// Attribute carrying the component name.
pub const CLASS_ATTR: &str = "data-react-class";

/// Attribute carrying the encoded props.
pub const PROPS_ATTR: &str = "data-react-props";

static INSTANCE: OnceCell<React> = OnceCell::new();

/// Renders components through an embedded engine and wraps the markup for
/// client-side hydration.
pub struct React {
	engine: SharedEngine,
	sources: SourceBundle,
	escape_attributes: bool,
}

impl std::fmt::Debug for React {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("React")
			.field("react_bytes", &self.sources.react().len())
			.field("app_bytes", &self.sources.app().len())
			.field("escape_attributes", &self.escape_attributes)
			.finish_non_exhaustive()
	}
}

impl React {
	/// Loads both sources and starts the embedded JavaScript engine.
	///
	/// # Errors
	///
	/// A configuration error when a path is invalid, or the engine's
	/// initialization error when a source fails to evaluate.
	#[cfg(feature = "boa")]
	pub fn new(react_path: impl AsRef<Path>, app_path: impl AsRef<Path>) -> ReactResult<Self> {
		Self::with_engine(react_path, app_path, |sources| {
			react_engine_js::ReactJs::new(sources.react(), sources.app())
		})
	}

	/// Loads both sources and builds the engine with `build`.
	///
	/// `build` runs only after both paths validated and both files were read.
	pub fn with_engine<E, F>(
		react_path: impl AsRef<Path>,
		app_path: impl AsRef<Path>,
		build: F,
	) -> ReactResult<Self>
	where
		E: RenderingEngine + 'static,
		F: FnOnce(&SourceBundle) -> Result<E, EngineError>,
	{
		let react_path = react_path.as_ref();
		let app_path = app_path.as_ref();
		let sources = SourceBundle::load(react_path, app_path)?;
		let engine = build(&sources)?;

		tracing::info!(
			react_path = %react_path.display(),
			app_path = %app_path.display(),
			"renderer constructed"
		);

		Ok(Self::from_parts(sources, Arc::new(engine)))
	}

	/// Assembles a facade from already loaded parts.
	pub fn from_parts(sources: SourceBundle, engine: SharedEngine) -> Self {
		Self {
			engine,
			sources,
			escape_attributes: false,
		}
	}

	/// Builds the facade from resolved settings using the embedded engine.
	#[cfg(feature = "boa")]
	pub fn from_settings(settings: &EngineSettings) -> ReactResult<Self> {
		Ok(Self::new(settings.react_source_path(), settings.app_source_path())?
			.escape_attributes(settings.escape_attributes))
	}

	/// Builds the facade from resolved settings with a custom engine.
	pub fn from_settings_with<E, F>(settings: &EngineSettings, build: F) -> ReactResult<Self>
	where
		E: RenderingEngine + 'static,
		F: FnOnce(&SourceBundle) -> Result<E, EngineError>,
	{
		Ok(
			Self::with_engine(settings.react_source_path(), settings.app_source_path(), build)?
				.escape_attributes(settings.escape_attributes),
		)
	}

	/// Entity-encode pass-through attribute values.
	///
	/// Off by default: attribute values are written verbatim and must come
	/// from trusted code.
	pub fn escape_attributes(mut self, enable: bool) -> Self {
		self.escape_attributes = enable;
		self
	}

	/// The loaded sources.
	pub fn sources(&self) -> &SourceBundle {
		&self.sources
	}

	/// Renders `component` and wraps the result for hydration.
	///
	/// Pass `&()` or `&None::<T>` for a component without props; they are
	/// serialized as `null`.
	///
	/// Every pass-through attribute is written with one leading space and the
	/// opening tag closes right after the last attribute. Templates that
	/// expect a space before `>` when no attribute is given (`...='null' >`)
	/// see `...='null'>` instead; the markup is equivalent for browsers and
	/// for client-side hydration.
	///
	/// # Errors
	///
	/// [`ReactError::Serialization`](crate::ReactError::Serialization) when the
	/// props cannot be serialized and
	/// [`ReactError::Engine`](crate::ReactError::Engine) when the engine fails.
	///
	/// # Example
	///
	/// ```ignore
	/// let html = react.render(
	///     "Greeting",
	///     &json!({"name": "Ana"}),
	///     &RenderOptions::new().tag("span").attr("id", "g1"),
	/// )?;
	/// ```
	pub fn render<P>(&self, component: &str, props: &P, options: &RenderOptions) -> ReactResult<String>
	where
		P: Serialize + ?Sized,
	{
		let markup = if options.pre_render {
			let props_json = serde_json::to_string(props)?;
			self.engine.render_component(component, &props_json)?
		} else {
			String::new()
		};

		let encoded_props = encode_props(props)?;

		tracing::debug!(
			component,
			tag = %options.tag,
			pre_render = options.pre_render,
			attributes = options.attributes.len(),
			"rendered component"
		);

		Ok(self.assemble(component, &encoded_props, options, &markup))
	}

	/// Renders with a loose option bag instead of typed options.
	pub fn render_with_bag<P, K, V, I>(&self, component: &str, props: &P, bag: I) -> ReactResult<String>
	where
		P: Serialize + ?Sized,
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<OptionValue>,
	{
		self.render(component, props, &RenderOptions::from_bag(bag))
	}

	fn assemble(
		&self,
		component: &str,
		encoded_props: &str,
		options: &RenderOptions,
		markup: &str,
	) -> String {
		let tag = options.tag.as_str();
		let mut html = String::with_capacity(
			64 + tag.len() * 2 + component.len() + encoded_props.len() + markup.len(),
		);

		html.push('<');
		html.push_str(tag);
		html.push_str(&format!(" {CLASS_ATTR}='{component}' {PROPS_ATTR}='{encoded_props}'"));
		for (name, value) in &options.attributes {
			if self.escape_attributes {
				html.push_str(&format!(" {name}='{}'", html_entities(value)));
			} else {
				html.push_str(&format!(" {name}='{value}'"));
			}
		}
		html.push('>');
		html.push_str(markup);
		html.push_str("</");
		html.push_str(tag);
		html.push('>');
		html
	}

	/// The process-wide instance, configured from the standard settings
	/// sources (defaults and `REACT_ENGINE_*` environment variables).
	///
	/// The first successful call constructs the instance; later calls return
	/// it without reading configuration again. A failed construction is not
	/// cached, so the next call tries again.
	#[cfg(feature = "boa")]
	pub fn instance() -> ReactResult<&'static React> {
		Self::instance_from(&SettingsBuilder::with_standard_sources())
	}

	/// Like [`instance`](Self::instance) but with caller-provided sources.
	#[cfg(feature = "boa")]
	pub fn instance_from(builder: &SettingsBuilder) -> ReactResult<&'static React> {
		Self::instance_with(|| {
			let settings = builder.build()?;
			Self::from_settings(&settings)
		})
	}

	/// Returns the process-wide instance, constructing it with `init` on
	/// first use.
	///
	/// Concurrent first calls block on one initialization; `init` runs at
	/// most once per successful construction.
	pub fn instance_with<F>(init: F) -> ReactResult<&'static React>
	where
		F: FnOnce() -> ReactResult<React>,
	{
		if let Some(instance) = INSTANCE.get() {
			return Ok(instance);
		}
		INSTANCE.get_or_try_init(|| {
			tracing::info!("initializing process-wide renderer");
			init()
		})
	}

	/// The process-wide instance if it has been constructed.
	pub fn try_instance() -> Option<&'static React> {
		INSTANCE.get()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ReactError;
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::Mutex;

	/// Engine that records its calls and returns canned markup.
	#[derive(Default)]
	struct RecordingEngine {
		calls: Mutex<Vec<(String, String)>>,
	}

	impl RenderingEngine for RecordingEngine {
		fn render_component(&self, component: &str, props_json: &str) -> Result<String, EngineError> {
			self.calls
				.lock()
				.unwrap()
				.push((component.to_string(), props_json.to_string()));
			match component {
				"Greeting" => {
					let props: serde_json::Value = serde_json::from_str(props_json).unwrap();
					Ok(format!("<h1>Hello {}</h1>", props["name"].as_str().unwrap_or("")))
				}
				"X" => Ok("<x></x>".to_string()),
				other => Err(EngineError::RenderFailed(format!(
					"ReferenceError: {other} is not defined"
				))),
			}
		}
	}

	#[fixture]
	fn engine() -> Arc<RecordingEngine> {
		Arc::new(RecordingEngine::default())
	}

	fn react(engine: &Arc<RecordingEngine>) -> React {
		React::from_parts(SourceBundle::default(), engine.clone())
	}

	#[rstest]
	fn test_render_greeting_in_span(engine: Arc<RecordingEngine>) {
		// Arrange
		let react = react(&engine);
		let options = RenderOptions::from_bag([("tag", "span"), ("id", "g1")]);

		// Act
		let html = react.render("Greeting", &json!({"name": "Ana"}), &options).unwrap();

		// Assert
		assert_eq!(
			html,
			"<span data-react-class='Greeting' data-react-props='{&quot;name&quot;:&quot;Ana&quot;}' id='g1'><h1>Hello Ana</h1></span>"
		);
	}

	#[rstest]
	fn test_render_null_props(engine: Arc<RecordingEngine>) {
		let react = react(&engine);

		let html = react.render("X", &(), &RenderOptions::default()).unwrap();

		assert_eq!(html, "<div data-react-class='X' data-react-props='null'><x></x></div>");
		assert_eq!(
			engine.calls.lock().unwrap().as_slice(),
			&[("X".to_string(), "null".to_string())]
		);
	}

	#[rstest]
	fn test_client_only_skips_engine(engine: Arc<RecordingEngine>) {
		let react = react(&engine);

		let html = react
			.render("Missing", &json!({"a": 1}), &RenderOptions::new().client_only())
			.unwrap();

		assert_eq!(
			html,
			"<div data-react-class='Missing' data-react-props='{&quot;a&quot;:1}'></div>"
		);
		assert!(engine.calls.lock().unwrap().is_empty());
	}

	#[rstest]
	fn test_engine_error_propagates(engine: Arc<RecordingEngine>) {
		let react = react(&engine);

		let err = react
			.render("Unknown", &(), &RenderOptions::default())
			.unwrap_err();

		assert!(matches!(
			err,
			ReactError::Engine(EngineError::RenderFailed(ref m)) if m.contains("Unknown")
		));
	}

	#[rstest]
	fn test_serialization_error_propagates(engine: Arc<RecordingEngine>) {
		let react = react(&engine);
		let mut props = std::collections::BTreeMap::new();
		props.insert(vec![1u8], "bad key");

		let err = react
			.render("X", &props, &RenderOptions::new().client_only())
			.unwrap_err();

		assert!(matches!(err, ReactError::Serialization(_)));
	}

	#[rstest]
	fn test_attributes_verbatim_by_default(engine: Arc<RecordingEngine>) {
		let react = react(&engine);
		let options = RenderOptions::new()
			.client_only()
			.attr("class", "a<b")
			.attr("title", "it's");

		let html = react.render("X", &(), &options).unwrap();

		assert_eq!(
			html,
			"<div data-react-class='X' data-react-props='null' class='a<b' title='it's'></div>"
		);
	}

	#[rstest]
	fn test_attributes_escaped_when_enabled(engine: Arc<RecordingEngine>) {
		let react = react(&engine).escape_attributes(true);
		let options = RenderOptions::new().client_only().attr("title", "it's <b>");

		let html = react.render("X", &(), &options).unwrap();

		assert!(html.ends_with(" title='it&#039;s &lt;b&gt;'></div>"));
	}

	#[rstest]
	fn test_boolean_attribute_values(engine: Arc<RecordingEngine>) {
		let react = react(&engine);

		let html = react
			.render_with_bag(
				"X",
				&(),
				[
					("preRender", OptionValue::Bool(false)),
					("hidden", OptionValue::Bool(true)),
					("draggable", OptionValue::Bool(false)),
				],
			)
			.unwrap();

		assert_eq!(
			html,
			"<div data-react-class='X' data-react-props='null' hidden='1' draggable=''></div>"
		);
	}

	#[rstest]
	fn test_render_is_idempotent(engine: Arc<RecordingEngine>) {
		let react = react(&engine);
		let options = RenderOptions::new().attr("id", "same");
		let props = json!({"name": "Ana"});

		let first = react.render("Greeting", &props, &options).unwrap();
		let second = react.render("Greeting", &props, &options).unwrap();

		assert_eq!(first, second);
	}
}
