//! Style baking: inlining color and concrete sizing into an artifact
//!
//! Engine output leans on inherited presentation (`currentColor`, ex-sized
//! width/height) that only resolves inside a live document. Baking rewrites
//! the tree so the exported markup is self-contained: every drawable
//! primitive carries the configured color both as a `fill` attribute and as
//! a `style` presentation property, and top-level sizing is in pixels.
//!
//! Unit conversion: 1em = configured font size, 1ex = 0.5em, 1pt = 4/3 px,
//! unitless and px values pass through.

use crate::style::StyleConfig;

use super::{BakedArtifact, RawArtifact, SvgChild, SvgNode};

/// Element names that draw marks and therefore need the color dual-write
const DRAWABLE: &[&str] = &[
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon", "text", "tspan", "use",
];

/// Bake a style into a raw artifact
///
/// Pure function: identical `(raw, style)` inputs always produce an
/// identical baked tree. A structurally empty raw artifact bakes to an
/// empty but well-formed artifact.
pub fn bake(raw: &RawArtifact, style: &StyleConfig) -> BakedArtifact {
    let mut root = raw.root().clone();
    let em = f64::from(style.font_size_px);

    let (fallback_w, fallback_h) = viewbox_size(&root);
    let width_px = root
        .attr("width")
        .map(|v| to_px(v, em))
        .unwrap_or(fallback_w);
    let height_px = root
        .attr("height")
        .map(|v| to_px(v, em))
        .unwrap_or(fallback_h);

    root.set_attr("width", format_px(width_px));
    root.set_attr("height", format_px(height_px));
    root.set_attr("fill", style.color_hex.as_str());
    root.set_attr(
        "style",
        format!(
            "color: {c}; fill: {c}; font-size: {s}px",
            c = style.color_hex,
            s = style.font_size_px
        ),
    );

    for child in &mut root.children {
        if let SvgChild::Element(elem) = child {
            apply_color(elem, &style.color_hex);
        }
    }

    BakedArtifact::from_parts(root, width_px, height_px)
}

fn apply_color(node: &mut SvgNode, color: &str) {
    // resolve inherited-color indirections wherever they appear
    for (_, value) in &mut node.attrs {
        if value == "currentColor" {
            *value = color.to_string();
        }
    }

    if DRAWABLE.contains(&node.name.as_str()) {
        node.set_attr("fill", color);
        node.set_attr("style", format!("fill: {color}"));
    }

    for child in &mut node.children {
        if let SvgChild::Element(elem) = child {
            apply_color(elem, color);
        }
    }
}

/// Width/height fallback taken from the viewBox, interpreted as pixels
fn viewbox_size(root: &SvgNode) -> (f64, f64) {
    let Some(viewbox) = root.attr("viewBox") else {
        return (0.0, 0.0);
    };
    let parts: Vec<f64> = viewbox
        .split_whitespace()
        .filter_map(|p| p.parse().ok())
        .collect();
    match parts.as_slice() {
        [_, _, w, h] => (w.max(0.0), h.max(0.0)),
        _ => (0.0, 0.0),
    }
}

/// Convert an engine dimension such as `6.902ex` to pixels
fn to_px(value: &str, em: f64) -> f64 {
    let value = value.trim();
    let split = value
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let Ok(number) = number.trim().parse::<f64>() else {
        return 0.0;
    };
    match unit.trim() {
        "ex" => number * em * 0.5,
        "em" => number * em,
        "pt" => number * 4.0 / 3.0,
        "" | "px" => number,
        // percentages and anything exotic have no concrete meaning outside
        // a live document; treat the number as user units
        _ => number,
    }
}

/// Format a pixel value with up to three decimals and no trailing zeros
fn format_px(value: f64) -> String {
    let mut s = format!("{value:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
