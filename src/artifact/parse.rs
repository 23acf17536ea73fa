//! Parsing engine markup into the vector tree

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{ArtifactError, RawArtifact, SvgChild, SvgNode};

/// Parse engine SVG markup into a [`RawArtifact`]
///
/// The document root must be an `<svg>` element. XML declarations, comments,
/// doctypes, and processing instructions are skipped; whitespace-only text is
/// dropped. Any well-formedness problem surfaces as [`ArtifactError::Parse`].
pub fn parse_markup(markup: &str) -> Result<RawArtifact, ArtifactError> {
    let mut reader = Reader::from_str(markup);
    let mut stack: Vec<SvgNode> = Vec::new();
    let mut root: Option<SvgNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(node_from_tag(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let node = node_from_tag(&e)?;
                place(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| ArtifactError::Parse("unbalanced closing tag".to_string()))?;
                place(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| ArtifactError::Parse(e.to_string()))?
                    .into_owned();
                if !text.trim().is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(SvgChild::Text(text));
                    }
                }
            }
            Ok(Event::CData(t)) => {
                let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(SvgChild::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            // declarations, comments, doctypes, processing instructions
            Ok(_) => {}
            Err(e) => return Err(ArtifactError::Parse(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(ArtifactError::Parse("unclosed element".to_string()));
    }

    let root = root.ok_or_else(|| ArtifactError::Parse("no root element".to_string()))?;
    if root.name != "svg" {
        return Err(ArtifactError::Parse(format!(
            "expected <svg> root, found <{}>",
            root.name
        )));
    }
    Ok(RawArtifact::from_root(root))
}

fn node_from_tag(tag: &BytesStart<'_>) -> Result<SvgNode, ArtifactError> {
    let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
    let mut node = SvgNode::new(name);
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| ArtifactError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ArtifactError::Parse(e.to_string()))?
            .into_owned();
        node.attrs.push((key, value));
    }
    Ok(node)
}

/// Attach a finished node to its parent, or install it as the document root
fn place(
    stack: &mut [SvgNode],
    root: &mut Option<SvgNode>,
    node: SvgNode,
) -> Result<(), ArtifactError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(SvgChild::Element(node));
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(ArtifactError::Parse(
                    "multiple root elements".to_string(),
                ));
            }
            *root = Some(node);
            Ok(())
        }
    }
}
