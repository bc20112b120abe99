//! # react-engine-js
//!
//! JavaScript side of react-engine: the [`RenderingEngine`] trait the facade
//! renders through, and [`ReactJs`], an embedded boa_engine context that
//! evaluates a React build plus an application bundle and renders components
//! with `ReactDOMServer.renderToString`.
//!
//! ## Feature Flags
//!
//! - `boa` (default) - the boa_engine backed [`ReactJs`] engine

mod engine;
#[cfg(feature = "boa")]
mod react_js;

pub use engine::{EngineError, RenderingEngine, SharedEngine};
#[cfg(feature = "boa")]
pub use react_js::ReactJs;
