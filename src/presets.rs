//! Built-in formula presets
//!
//! A small catalog of well-known formulas used as quick-start sources.
//! Presets are plain data; selecting one just feeds its source text into
//! the render pipeline like any other formula edit.

/// Formula source shown on first launch
pub const DEFAULT_FORMULA: &str = r"\int_{-\infty}^{\infty} e^{-x^2} \, dx = \sqrt{\pi}";

/// A named formula source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub source: &'static str,
}

/// Built-in preset catalog
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "quadratic",
        source: r"x = \frac{-b \pm \sqrt{b^2 - 4ac}}{2a}",
    },
    Preset {
        name: "gaussian",
        source: r"\int_{-\infty}^{\infty} e^{-x^2} \, dx = \sqrt{\pi}",
    },
    Preset {
        name: "maxwell",
        source: r"\nabla \times \mathbf{E} = -\frac{\partial \mathbf{B}}{\partial t}",
    },
    Preset {
        name: "matrix",
        source: r"\begin{pmatrix} a & b \\ c & d \end{pmatrix}",
    },
];

/// Look up a preset by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
