//! React server-side rendering on boa_engine.
//!
//! # Thread Safety
//!
//! `boa_engine::Context` is `!Send + !Sync`. [`ReactJs`] therefore owns a
//! dedicated thread that holds the `Context` and receives commands over a
//! bounded `std::sync::mpsc` channel. The handle only keeps the
//! `SyncSender`, which makes it `Send + Sync` without `unsafe impl`.
//!
//! # Loading
//!
//! The context is prepared in three steps: a small prelude that aliases
//! `global`, `self` and `window` to the global object and installs a silent
//! `console`, then the rendering library (which must define `React` and
//! `ReactDOMServer` globals, as the UMD builds do), then the application
//! bundle that declares the components.
//!
//! # Example
//!
//! ```ignore
//! use react_engine_js::{ReactJs, RenderingEngine};
//!
//! let engine = ReactJs::new(&react_source, &app_source)?;
//! let html = engine.render_component("Greeting", r#"{"name":"Ana"}"#)?;
//! ```

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use boa_engine::{Context, JsError, JsValue, Source};

use crate::engine::{EngineError, RenderingEngine};

/// Globals expected by browser-targeted bundles.
const PRELUDE: &str = r#"
	var global = globalThis, self = globalThis, window = globalThis;
	var console = (function() {
		var noop = function() {};
		return { log: noop, info: noop, warn: noop, error: noop, debug: noop, trace: noop };
	})();
"#;

/// Pending commands before senders block.
const COMMAND_QUEUE_DEPTH: usize = 16;

/// Command sent to the dedicated JavaScript runtime thread.
enum RuntimeCommand {
	/// Evaluate JavaScript code and return the result as a string.
	Eval {
		code: String,
		response_tx: mpsc::Sender<Result<String, EngineError>>,
	},
	/// Render a component to an HTML string.
	RenderComponent {
		component: String,
		props_json: String,
		response_tx: mpsc::Sender<Result<String, EngineError>>,
	},
}

/// Embedded React renderer.
///
/// Constructed once from the rendering library and application sources; all
/// later calls reuse the same JavaScript context.
pub struct ReactJs {
	command_tx: SyncSender<RuntimeCommand>,
}

impl ReactJs {
	/// Starts the runtime thread and loads both sources.
	///
	/// `app_source` may be empty, in which case only the library is loaded.
	///
	/// # Errors
	///
	/// Returns [`EngineError::InitFailed`] if the thread cannot be spawned or
	/// either source fails to evaluate.
	pub fn new(react_source: &str, app_source: &str) -> Result<Self, EngineError> {
		let (command_tx, command_rx) = mpsc::sync_channel::<RuntimeCommand>(COMMAND_QUEUE_DEPTH);
		let (init_tx, init_rx) = mpsc::channel::<Result<(), EngineError>>();

		let react_source = react_source.to_string();
		let app_source = app_source.to_string();

		thread::Builder::new()
			.name("react-engine-js".to_string())
			.spawn(move || {
				runtime_thread_main(&react_source, &app_source, command_rx, init_tx);
			})
			.map_err(|e| EngineError::InitFailed(format!("failed to spawn runtime thread: {e}")))?;

		init_rx.recv().map_err(|_| {
			EngineError::InitFailed("Runtime thread terminated during initialization".to_string())
		})??;

		tracing::info!("JavaScript rendering engine initialized");

		Ok(Self { command_tx })
	}

	/// Evaluates JavaScript code in the engine context and returns the result
	/// converted to a string.
	pub fn eval(&self, code: &str) -> Result<String, EngineError> {
		let (response_tx, response_rx) = mpsc::channel();
		self.command_tx
			.send(RuntimeCommand::Eval {
				code: code.to_string(),
				response_tx,
			})
			.map_err(|_| EngineError::Unavailable("runtime thread has stopped".to_string()))?;

		response_rx.recv().map_err(|_| {
			EngineError::Unavailable("runtime thread terminated during evaluation".to_string())
		})?
	}
}

impl RenderingEngine for ReactJs {
	fn render_component(&self, component: &str, props_json: &str) -> Result<String, EngineError> {
		let (response_tx, response_rx) = mpsc::channel();
		self.command_tx
			.send(RuntimeCommand::RenderComponent {
				component: component.to_string(),
				props_json: props_json.to_string(),
				response_tx,
			})
			.map_err(|_| EngineError::Unavailable("runtime thread has stopped".to_string()))?;

		response_rx.recv().map_err(|_| {
			EngineError::Unavailable("runtime thread terminated during rendering".to_string())
		})?
	}
}

/// Main function for the dedicated JavaScript runtime thread.
fn runtime_thread_main(
	react_source: &str,
	app_source: &str,
	command_rx: Receiver<RuntimeCommand>,
	init_tx: mpsc::Sender<Result<(), EngineError>>,
) {
	let mut context = Context::default();

	let init_result = load_sources(&mut context, react_source, app_source);
	let init_ok = init_result.is_ok();

	if init_tx.send(init_result).is_err() || !init_ok {
		return;
	}

	// Runs until every sender is dropped
	while let Ok(command) = command_rx.recv() {
		match command {
			RuntimeCommand::Eval { code, response_tx } => {
				let _ = response_tx.send(eval_code(&code, &mut context));
			}
			RuntimeCommand::RenderComponent {
				component,
				props_json,
				response_tx,
			} => {
				let _ = response_tx.send(render_component_code(&component, &props_json, &mut context));
			}
		}
	}
}

fn load_sources(
	context: &mut Context,
	react_source: &str,
	app_source: &str,
) -> Result<(), EngineError> {
	let steps = [
		("prelude", PRELUDE),
		("rendering library", react_source),
		("application bundle", app_source),
	];

	for (label, code) in steps {
		if code.trim().is_empty() {
			continue;
		}
		context.eval(Source::from_bytes(code)).map_err(|e| {
			EngineError::InitFailed(format!(
				"failed to load {label}: {}",
				js_error_to_string(&e, context)
			))
		})?;
	}

	Ok(())
}

fn eval_code(code: &str, context: &mut Context) -> Result<String, EngineError> {
	let result = context
		.eval(Source::from_bytes(code))
		.map_err(|e| EngineError::EvalFailed(js_error_to_string(&e, context)))?;

	js_value_to_string(&result, context).map_err(EngineError::EvalFailed)
}

/// Renders `component` through `ReactDOMServer.renderToString`.
///
/// The component name is spliced in as an expression so namespaced
/// components such as `App.Header` resolve.
fn render_component_code(
	component: &str,
	props_json: &str,
	context: &mut Context,
) -> Result<String, EngineError> {
	let render_script = format!(
		r#"
		(function() {{
			var props = {props_json};
			return ReactDOMServer.renderToString(React.createElement({component}, props));
		}})()
		"#
	);

	let result = context
		.eval(Source::from_bytes(&render_script))
		.map_err(|e| EngineError::RenderFailed(js_error_to_string(&e, context)))?;

	js_value_to_string(&result, context).map_err(EngineError::RenderFailed)
}

fn js_value_to_string(value: &JsValue, context: &mut Context) -> Result<String, String> {
	value
		.to_string(context)
		.map(|s| s.to_std_string_escaped())
		.map_err(|e| js_error_to_string(&e, context))
}

fn js_error_to_string(error: &JsError, context: &mut Context) -> String {
	error
		.to_opaque(context)
		.to_string(context)
		.map(|s| s.to_std_string_escaped())
		.unwrap_or_else(|_| "Unknown JavaScript error".to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use std::sync::Arc;

	/// Miniature rendering library exposing the React/ReactDOMServer surface.
	const MINI_REACT: &str = r#"
		var React = {
			createElement: function(type, props) {
				return { type: type, props: props };
			}
		};
		var ReactDOMServer = {
			renderToString: function(element) {
				return element.type(element.props);
			}
		};
	"#;

	const APP: &str = r#"
		var Greeting = function(props) {
			return '<h1>Hello ' + props.name + '</h1>';
		};
		var Empty = function(props) {
			return '<p>' + (props === null ? 'no props' : 'props') + '</p>';
		};
		var App = {
			Header: function(props) { return '<header>' + props.title + '</header>'; }
		};
	"#;

	#[fixture]
	fn engine() -> ReactJs {
		ReactJs::new(MINI_REACT, APP).unwrap()
	}

	#[rstest]
	fn test_render_component(engine: ReactJs) {
		let html = engine
			.render_component("Greeting", r#"{"name":"Ana"}"#)
			.unwrap();
		assert_eq!(html, "<h1>Hello Ana</h1>");
	}

	#[rstest]
	fn test_render_with_null_props(engine: ReactJs) {
		let html = engine.render_component("Empty", "null").unwrap();
		assert_eq!(html, "<p>no props</p>");
	}

	#[rstest]
	fn test_render_namespaced_component(engine: ReactJs) {
		let html = engine
			.render_component("App.Header", r#"{"title":"News"}"#)
			.unwrap();
		assert_eq!(html, "<header>News</header>");
	}

	#[rstest]
	fn test_unknown_component_is_render_error(engine: ReactJs) {
		let result = engine.render_component("Missing", "null");
		assert!(matches!(result, Err(EngineError::RenderFailed(_))));
	}

	#[rstest]
	fn test_eval_sees_prelude_globals(engine: ReactJs) {
		assert_eq!(engine.eval("typeof window.React").unwrap(), "object");
		assert_eq!(engine.eval("typeof console.log").unwrap(), "function");
	}

	#[rstest]
	fn test_empty_app_source() {
		let engine = ReactJs::new(MINI_REACT, "").unwrap();
		assert_eq!(engine.eval("typeof Greeting").unwrap(), "undefined");
	}

	#[rstest]
	fn test_broken_library_fails_initialization() {
		let result = ReactJs::new("var React = ;", "");
		match result {
			Err(EngineError::InitFailed(message)) => {
				assert!(message.contains("rendering library"));
			}
			_ => panic!("expected initialization failure"),
		}
	}

	#[rstest]
	fn test_broken_app_fails_initialization() {
		let result = ReactJs::new(MINI_REACT, "throw new Error('boom');");
		match result {
			Err(EngineError::InitFailed(message)) => {
				assert!(message.contains("application bundle"));
				assert!(message.contains("boom"));
			}
			_ => panic!("expected initialization failure"),
		}
	}

	#[rstest]
	fn test_react_js_is_send_and_sync() {
		fn assert_send<T: Send>() {}
		fn assert_sync<T: Sync>() {}
		assert_send::<ReactJs>();
		assert_sync::<ReactJs>();
	}

	#[rstest]
	fn test_shared_engine_across_threads(engine: ReactJs) {
		// Arrange
		let engine = Arc::new(engine);
		let engine_clone = Arc::clone(&engine);

		// Act
		let handle = std::thread::spawn(move || {
			engine_clone
				.render_component("Greeting", r#"{"name":"Thread"}"#)
				.unwrap()
		});

		// Assert
		assert_eq!(handle.join().unwrap(), "<h1>Hello Thread</h1>");
	}
}
