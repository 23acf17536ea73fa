//! Typesetting engine capability
//!
//! Formula parsing and glyph layout are delegated to an external engine.
//! The engine is an explicit injected capability: callers hand a
//! [`TypesetEngine`] to the pipeline rather than probing ambient state, and
//! an engine that cannot be reached surfaces as a typed
//! [`EngineError::Unavailable`] instead of a silent no-op.

pub mod mathjax;

pub use mathjax::MathJaxCli;

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by a typesetting engine invocation
#[derive(Error, Debug)]
pub enum EngineError {
    /// The formula source could not be typeset; carries the engine's
    /// diagnostic text verbatim
    #[error("{0}")]
    Syntax(String),
    /// The engine itself cannot be invoked
    #[error("typesetting engine unavailable: {0}")]
    Unavailable(String),
    /// The engine ran but misbehaved (I/O failure, nonzero exit without a
    /// diagnostic, unreadable output)
    #[error("typesetting engine failed: {0}")]
    Failed(String),
}

/// An external math typesetting engine
///
/// `typeset` converts formula source into SVG markup. It is the single
/// suspension point of a render cycle; implementations must be stateless
/// apart from the external invocation itself.
#[async_trait]
pub trait TypesetEngine: Send + Sync {
    /// Typeset formula source into SVG markup
    ///
    /// `display_mode` selects block display layout rather than inline.
    async fn typeset(&self, source: &str, display_mode: bool) -> Result<String, EngineError>;
}
