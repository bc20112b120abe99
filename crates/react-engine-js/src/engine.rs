//! The rendering engine seam.

use std::sync::Arc;

/// Something that turns a component name and its props into markup.
///
/// Implementations must be safe to share between threads: one engine serves
/// every render call of the process.
pub trait RenderingEngine: Send + Sync {
	/// Renders `component` with the given props and returns its markup.
	///
	/// `props_json` is the JSON text of the props (`null` when absent).
	/// Unknown components and script errors are reported as
	/// [`EngineError::RenderFailed`].
	fn render_component(&self, component: &str, props_json: &str) -> Result<String, EngineError>;
}

impl<E: RenderingEngine + ?Sized> RenderingEngine for Arc<E> {
	fn render_component(&self, component: &str, props_json: &str) -> Result<String, EngineError> {
		(**self).render_component(component, props_json)
	}
}

impl<E: RenderingEngine + ?Sized> RenderingEngine for Box<E> {
	fn render_component(&self, component: &str, props_json: &str) -> Result<String, EngineError> {
		(**self).render_component(component, props_json)
	}
}

/// Shared rendering engine handle.
pub type SharedEngine = Arc<dyn RenderingEngine>;

/// JavaScript engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
	/// The engine could not load its sources
	#[error("JavaScript runtime initialization failed: {0}")]
	InitFailed(String),

	/// JavaScript evaluation failed
	#[error("JavaScript evaluation failed: {0}")]
	EvalFailed(String),

	/// Component rendering failed
	#[error("Component rendering failed: {0}")]
	RenderFailed(String),

	/// The runtime thread is gone
	#[error("JavaScript runtime is not available: {0}")]
	Unavailable(String),
}
