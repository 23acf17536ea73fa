//! End-to-end pipeline tests over a scripted engine
//!
//! Exercises the full typeset -> bake -> serialize path with engine output
//! shaped like real MathJax 3 SVG, without requiring the CLI to be
//! installed.

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use mathsmith::{
    render, render_with_config, EngineError, FontVariant, RenderConfig, RenderError, StyleConfig,
    TypesetEngine, TypesetError, SVG_MIME,
};

/// MathJax-shaped responses keyed on the source text the engine receives
struct ScriptedEngine;

const QUADRATIC_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="21.1ex" height="5.3ex" "#,
    r#"viewBox="0 -1342 9325 2345" role="img" focusable="false">"#,
    r#"<defs><path id="MJX-1-TEX-I-78" d="M52 289Q59 331 106 386T222 442"/>"#,
    r#"<path id="MJX-1-TEX-N-3D" d="M56 347Q56 360 70 367H707"/></defs>"#,
    r#"<g stroke="currentColor" fill="currentColor" stroke-width="0" transform="scale(1,-1)">"#,
    r##"<g data-mml-node="math"><use href="#MJX-1-TEX-I-78"/>"##,
    r#"<g data-mml-node="mfrac" transform="translate(1000,0)">"#,
    r##"<use href="#MJX-1-TEX-N-3D"/><rect width="7547" height="60" x="120" y="220"/>"##,
    r#"</g></g></g></svg>"#
);

#[async_trait]
impl TypesetEngine for ScriptedEngine {
    async fn typeset(&self, source: &str, display_mode: bool) -> Result<String, EngineError> {
        assert!(display_mode, "pipeline defaults to display mode");
        if source.contains(r"\int_{") {
            return Err(EngineError::Syntax(
                "Missing close brace after \\int_".to_string(),
            ));
        }
        Ok(QUADRATIC_SVG.to_string())
    }
}

fn style(size: u32, color: &str, variant: FontVariant) -> StyleConfig {
    StyleConfig::new(size, color, variant).expect("valid style")
}

#[tokio::test]
async fn quadratic_formula_renders_with_baked_fill_and_size() {
    let config = RenderConfig::new().with_style(style(24, "#000000", FontVariant::Standard));
    let svg = render_with_config(
        r"x = \frac{-b \pm \sqrt{b^2-4ac}}{2a}",
        &ScriptedEngine,
        config,
    )
    .await
    .expect("renders");

    // every drawable primitive carries the color twice; the root and the
    // resolved currentColor group carry the fill attribute as well
    assert_eq!(svg.matches(r##"fill="#000000""##).count(), 7);
    assert_eq!(svg.matches(r##"style="fill: #000000""##).count(), 5);
    // concrete pixel sizing: 21.1ex / 5.3ex at 24px font
    assert!(svg.contains(r#"width="253.2""#), "svg was: {svg}");
    assert!(svg.contains(r#"height="63.6""#));
    // no stylesheet-dependent indirection survives
    assert!(!svg.contains("currentColor"));
}

#[tokio::test]
async fn repeated_renders_are_byte_identical() {
    let source = r"x = \frac{-b \pm \sqrt{b^2-4ac}}{2a}";
    let first = render(source, &ScriptedEngine).await.expect("renders");
    let second = render(source, &ScriptedEngine).await.expect("renders");
    assert_eq!(first, second);
}

#[tokio::test]
async fn invalid_source_fails_with_nonempty_diagnostic() {
    let err = render(r"\int_{", &ScriptedEngine).await.expect_err("fails");
    match err {
        RenderError::Typeset(TypesetError::Syntax { message }) => {
            assert!(!message.is_empty());
            assert!(message.contains("Missing close brace"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn color_change_rebakes_all_fills() {
    let source = r"x = \frac{-b \pm \sqrt{b^2-4ac}}{2a}";
    let black = render_with_config(
        source,
        &ScriptedEngine,
        RenderConfig::new().with_style(style(24, "#000000", FontVariant::Standard)),
    )
    .await
    .expect("renders");
    let red = render_with_config(
        source,
        &ScriptedEngine,
        RenderConfig::new().with_style(style(24, "#FF0000", FontVariant::Standard)),
    )
    .await
    .expect("renders");

    assert!(black.contains("#000000") && !black.contains("#FF0000"));
    assert!(red.contains("#FF0000") && !red.contains("#000000"));
    assert_eq!(
        black.matches("#000000").count(),
        red.matches("#FF0000").count()
    );
}

#[tokio::test]
async fn empty_source_yields_empty_success() {
    let svg = render("", &ScriptedEngine).await.expect("succeeds");
    assert!(svg.contains("<svg"));
    assert!(svg.contains(r#"width="0""#));
    assert!(svg.contains(r#"height="0""#));
}

#[tokio::test]
async fn output_is_standalone_markup() {
    let svg = render("x", &ScriptedEngine).await.expect("renders");
    assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#));
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert_eq!(SVG_MIME, "image/svg+xml");
}

#[tokio::test]
async fn variants_wrap_source_seen_by_engine() {
    struct EchoEngine;

    #[async_trait]
    impl TypesetEngine for EchoEngine {
        async fn typeset(&self, source: &str, _display_mode: bool) -> Result<String, EngineError> {
            Ok(format!(
                r#"<svg width="1ex" height="1ex"><text>{source}</text></svg>"#
            ))
        }
    }

    let config = RenderConfig::new().with_style(style(24, "#000000", FontVariant::SansSerif));
    let svg = render_with_config("a+b", &EchoEngine, config)
        .await
        .expect("renders");
    assert!(svg.contains(r"\mathsf{a+b}"), "svg was: {svg}");

    let config = RenderConfig::new().with_style(style(24, "#000000", FontVariant::Serif));
    let svg = render_with_config("a+b", &EchoEngine, config)
        .await
        .expect("renders");
    assert!(svg.contains(">a+b<"));
}
