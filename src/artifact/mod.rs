//! Vector artifact model
//!
//! A rendered formula is a tree of vector drawing primitives (paths, groups,
//! transform attributes) plus top-level sizing. The tree exists in two states
//! with distinct types so the raw form can never leak to export consumers:
//!
//! - [`RawArtifact`]: as produced by the typesetting engine, sized in
//!   engine-native units (ex/em), uncolored.
//! - [`BakedArtifact`]: color and fill inlined on every drawable primitive,
//!   width/height normalized to pixels, safe to serialize independent of any
//!   stylesheet or live document.

pub mod bake;
pub mod parse;
pub mod serialize;

pub use bake::bake;
pub use parse::parse_markup;
pub use serialize::{serialize, ExportConfig, SVG_MIME};

use thiserror::Error;

/// Errors that can occur while parsing or serializing artifact trees
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("malformed engine output: {0}")]
    Parse(String),
    #[error("failed to serialize artifact: {0}")]
    Serialize(String),
}

/// One child slot of an element: nested element or character data
#[derive(Debug, Clone, PartialEq)]
pub enum SvgChild {
    Element(SvgNode),
    Text(String),
}

/// An element in the vector tree
///
/// Attributes are kept in document order so serialization is deterministic:
/// identical trees always produce byte-identical markup.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgChild>,
}

impl SvgNode {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing one in place to preserve order
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Iterate over element children
    pub fn elements(&self) -> impl Iterator<Item = &SvgNode> {
        self.children.iter().filter_map(|c| match c {
            SvgChild::Element(e) => Some(e),
            SvgChild::Text(_) => None,
        })
    }
}

/// Engine output, unstyled and engine-unit sized
#[derive(Debug, Clone, PartialEq)]
pub struct RawArtifact {
    root: SvgNode,
}

impl RawArtifact {
    /// Wrap a parsed `<svg>` root element
    pub(crate) fn from_root(root: SvgNode) -> Self {
        Self { root }
    }

    /// The artifact produced for empty formula source
    pub fn empty() -> Self {
        let mut root = SvgNode::new("svg");
        root.set_attr("viewBox", "0 0 0 0");
        root.set_attr("width", "0");
        root.set_attr("height", "0");
        Self { root }
    }

    /// Whether this artifact draws nothing
    pub fn is_empty(&self) -> bool {
        self.root.elements().next().is_none()
    }

    pub fn root(&self) -> &SvgNode {
        &self.root
    }
}

/// Styled artifact ready for export
///
/// Only baked artifacts can be serialized; the type system keeps raw engine
/// output away from download and clipboard consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedArtifact {
    root: SvgNode,
    width_px: f64,
    height_px: f64,
}

impl BakedArtifact {
    pub(crate) fn from_parts(root: SvgNode, width_px: f64, height_px: f64) -> Self {
        Self {
            root,
            width_px,
            height_px,
        }
    }

    pub fn root(&self) -> &SvgNode {
        &self.root
    }

    /// Normalized width in pixels
    pub fn width_px(&self) -> f64 {
        self.width_px
    }

    /// Normalized height in pixels
    pub fn height_px(&self) -> f64 {
        self.height_px
    }
}
