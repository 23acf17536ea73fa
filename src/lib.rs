//! Mathsmith - typeset math formulas into print-ready standalone SVG
//!
//! This library drives an external typesetting engine to render formula
//! source, bakes styling (color, size, font variant) into the resulting
//! vector tree, and serializes it as a self-contained SVG suitable for
//! desktop publishing.
//!
//! # Example
//!
//! ```no_run
//! use mathsmith::{render, engine::MathJaxCli};
//!
//! # async fn demo() -> Result<(), mathsmith::RenderError> {
//! let engine = MathJaxCli::from_path();
//! let svg = render(r"x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}", &engine).await?;
//! assert!(svg.contains("<svg"));
//! # Ok(())
//! # }
//! ```
//!
//! For live use (editor preview, re-render on every keystroke) see
//! [`RenderController`], which adds sequence-numbered render cycles and
//! stale-result suppression on top of the same pipeline.

pub mod artifact;
pub mod controller;
pub mod engine;
pub mod generate;
pub mod presets;
pub mod style;
pub mod typeset;

pub use artifact::{BakedArtifact, ExportConfig, RawArtifact, SVG_MIME};
pub use controller::{CycleOutcome, RenderController, RenderOutput, RenderState};
pub use engine::{EngineError, TypesetEngine};
pub use generate::{FormulaGenerator, GenerateError, GeminiGenerator};
pub use style::{FontVariant, StyleConfig, StyleError};
pub use typeset::TypesetError;

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The formula could not be typeset
    #[error(transparent)]
    Typeset(#[from] TypesetError),
    /// The artifact could not be serialized
    #[error(transparent)]
    Artifact(#[from] artifact::ArtifactError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Styling baked into the artifact
    pub style: StyleConfig,
    /// SVG export options
    pub export: ExportConfig,
    /// Inline rather than block display layout
    pub inline: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style configuration
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Set the export configuration
    pub fn with_export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Typeset inline rather than in display mode
    pub fn with_inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

/// Render formula source to a standalone SVG string with default styling
///
/// One-shot entry point: typesets, bakes the default style, serializes.
pub async fn render<E>(source: &str, engine: &E) -> Result<String, RenderError>
where
    E: TypesetEngine + ?Sized,
{
    render_with_config(source, engine, RenderConfig::default()).await
}

/// Render formula source to a standalone SVG string with custom configuration
///
/// ```no_run
/// use mathsmith::{render_with_config, RenderConfig, StyleConfig, FontVariant};
/// use mathsmith::engine::MathJaxCli;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RenderConfig::new()
///     .with_style(StyleConfig::new(48, "#1a1a1a", FontVariant::SansSerif)?);
/// let svg = render_with_config(r"e^{i\pi} + 1 = 0", &MathJaxCli::from_path(), config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn render_with_config<E>(
    source: &str,
    engine: &E,
    config: RenderConfig,
) -> Result<String, RenderError>
where
    E: TypesetEngine + ?Sized,
{
    let raw = typeset::typeset(engine, source, config.style.variant, !config.inline).await?;
    let baked = artifact::bake(&raw, &config.style);
    Ok(artifact::serialize(&baked, &config.export)?)
}
