//! Typesetting adapter
//!
//! Sits between the pipeline and the external engine: applies the font
//! variant at the source-text level (the engine owns glyph shaping, so
//! variants cannot be applied after rendering), treats empty source as a
//! valid no-op, and converts every engine outcome into a typed result.
//! Nothing here mutates shared state.

use thiserror::Error;

use crate::artifact::{parse_markup, ArtifactError, RawArtifact};
use crate::engine::{EngineError, TypesetEngine};
use crate::style::FontVariant;

/// Typed failures of a typesetting attempt
#[derive(Error, Debug)]
pub enum TypesetError {
    /// The formula source is malformed; the message is the engine's
    /// diagnostic, verbatim
    #[error("{message}")]
    Syntax { message: String },
    /// The engine could not be invoked at all
    #[error("{0}")]
    Unavailable(String),
    /// The engine invocation failed for a non-syntax reason
    #[error("{0}")]
    Engine(String),
    /// The engine succeeded but produced markup this pipeline cannot read
    #[error(transparent)]
    Output(#[from] ArtifactError),
}

impl From<EngineError> for TypesetError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Syntax(message) => TypesetError::Syntax { message },
            EngineError::Unavailable(message) => TypesetError::Unavailable(message),
            EngineError::Failed(message) => TypesetError::Engine(message),
        }
    }
}

/// Typeset formula source into a raw artifact
///
/// Empty (or whitespace-only) source yields [`RawArtifact::empty`] without
/// touching the engine.
pub async fn typeset<E>(
    engine: &E,
    source: &str,
    variant: FontVariant,
    display_mode: bool,
) -> Result<RawArtifact, TypesetError>
where
    E: TypesetEngine + ?Sized,
{
    if source.trim().is_empty() {
        return Ok(RawArtifact::empty());
    }

    let wrapped = variant.wrap(source);
    let markup = engine.typeset(&wrapped, display_mode).await?;
    Ok(parse_markup(&markup)?)
}
