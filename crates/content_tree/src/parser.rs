//! HTML-tolerant markup parser
//!
//! Builds a `ContentTree` from quick-xml events while relaxing the XML rules
//! the service's HTML does not follow: void elements never take children,
//! end tags close up to the nearest matching element, stray end tags are
//! ignored, and elements still open at end of input are closed.

use crate::{ContentTree, Node, NodeIndex, Result, TreeError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

/// Elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parser turning rendered markup into a content tree
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    keep_whitespace_text: bool,
}

impl HtmlParser {
    /// Create a parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep text nodes that consist only of whitespace
    pub fn with_whitespace_text(mut self, keep: bool) -> Self {
        self.keep_whitespace_text = keep;
        self
    }

    /// Parse markup into a tree
    pub fn parse(&self, markup: &str) -> Result<ContentTree> {
        if markup.trim().is_empty() {
            return Err(TreeError::Empty);
        }

        let mut reader = Reader::from_str(markup);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut tree = ContentTree::new();
        // open elements: (tag, index)
        let mut open: Vec<(String, NodeIndex)> = Vec::new();

        loop {
            let parent = open.last().map(|(_, i)| *i).unwrap_or_else(|| tree.root());
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let node = element_node(&e, reader.buffer_position())?;
                    let tag = node.tag.clone();
                    let index = tree.append(parent, node);
                    if !is_void(&tag) {
                        open.push((tag, index));
                    }
                }
                Ok(Event::Empty(e)) => {
                    let node = element_node(&e, reader.buffer_position())?;
                    tree.append(parent, node);
                }
                Ok(Event::End(e)) => {
                    let tag = tag_name(e.name().as_ref());
                    match open.iter().rposition(|(open_tag, _)| *open_tag == tag) {
                        Some(depth) => open.truncate(depth),
                        None => tracing::trace!("Ignoring stray end tag </{}>", tag),
                    }
                }
                Ok(Event::Text(e)) => {
                    let raw = utf8(&e, reader.buffer_position())?;
                    let text = html_escape::decode_html_entities(raw);
                    if self.keep_whitespace_text || !text.trim().is_empty() {
                        tree.append(parent, Node::text(text.into_owned()));
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = utf8(&e, reader.buffer_position())?;
                    tree.append(parent, Node::text(text.to_string()));
                }
                Ok(Event::Eof) => break,
                // comments, doctype, declarations, processing instructions
                Ok(_) => {}
                Err(err) => {
                    return Err(TreeError::Malformed {
                        position: reader.error_position(),
                        message: err.to_string(),
                    });
                }
            }
        }

        if !open.is_empty() {
            tracing::debug!("Closed {} element(s) left open at end of markup", open.len());
        }
        tracing::debug!("Parsed content tree with {} nodes", tree.len());
        Ok(tree)
    }
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| TreeError::Malformed {
        position,
        message: e.to_string(),
    })
}

fn element_node(start: &BytesStart<'_>, position: u64) -> Result<Node> {
    let tag = tag_name(start.name().as_ref());
    let mut attributes = BTreeMap::new();
    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| TreeError::Malformed {
            position,
            message: e.to_string(),
        })?;
        let key = tag_name(attr.key.as_ref());
        let value = utf8(&attr.value, position)?;
        attributes
            .entry(key)
            .or_insert_with(|| html_escape::decode_html_entities(value).into_owned());
    }
    Ok(Node::element(tag, attributes))
}
