//! Serializing baked artifacts to standalone SVG markup

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{ArtifactError, BakedArtifact, SvgChild, SvgNode};

/// MIME type for the exported artifact
pub const SVG_MIME: &str = "image/svg+xml";

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Configuration options for artifact export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Whether to emit an XML declaration before the root element
    pub standalone: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { standalone: true }
    }
}

impl ExportConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output carries an XML declaration
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }
}

/// Serialize a baked artifact to a self-contained SVG string
///
/// The root element is guaranteed an `xmlns` declaration (and `xmlns:xlink`
/// when the tree uses `xlink:`-prefixed attributes), so the markup opens
/// correctly outside any live document context.
pub fn serialize(artifact: &BakedArtifact, config: &ExportConfig) -> Result<String, ArtifactError> {
    let mut root = artifact.root().clone();
    if root.attr("xmlns").is_none() {
        root.set_attr("xmlns", SVG_NS);
    }
    if root.attr("xmlns:xlink").is_none() && uses_xlink(&root) {
        root.set_attr("xmlns:xlink", XLINK_NS);
    }

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    if config.standalone {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
            .map_err(|e| ArtifactError::Serialize(e.to_string()))?;
    }
    write_node(&mut writer, &root)?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| ArtifactError::Serialize(e.to_string()))
}

fn write_node(writer: &mut Writer<Cursor<Vec<u8>>>, node: &SvgNode) -> Result<(), ArtifactError> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| ArtifactError::Serialize(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| ArtifactError::Serialize(e.to_string()))?;
    for child in &node.children {
        match child {
            SvgChild::Element(elem) => write_node(writer, elem)?,
            SvgChild::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| ArtifactError::Serialize(e.to_string()))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.name.as_str())))
        .map_err(|e| ArtifactError::Serialize(e.to_string()))
}

fn uses_xlink(node: &SvgNode) -> bool {
    if node.attrs.iter().any(|(k, _)| k.starts_with("xlink:")) {
        return true;
    }
    node.elements().any(uses_xlink)
}
