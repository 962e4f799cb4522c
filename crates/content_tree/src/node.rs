//! Content nodes and their classification

use crate::AnchorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag used for text nodes
pub const TEXT_TAG: &str = "#text";
/// Tag used for the synthetic root that holds the parsed markup
pub const DOCUMENT_TAG: &str = "#document";

/// Position of a node in its tree's arena.
///
/// Indices are only meaningful for the tree that produced them; a rebuilt
/// tree hands out fresh indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Get the raw arena slot
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Structural role of a node, derived from its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Document,
    Text,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell,
    TableHeaderCell,
    Heading(u8),
    Paragraph,
    Image,
    Other,
}

impl ContentKind {
    /// Classify a lower-cased tag name
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            DOCUMENT_TAG => ContentKind::Document,
            TEXT_TAG => ContentKind::Text,
            "ul" | "ol" => ContentKind::List,
            "li" => ContentKind::ListItem,
            "table" => ContentKind::Table,
            "tr" => ContentKind::TableRow,
            "td" => ContentKind::TableCell,
            "th" => ContentKind::TableHeaderCell,
            "p" => ContentKind::Paragraph,
            "img" => ContentKind::Image,
            _ => match tag.as_bytes() {
                [b'h', level @ b'1'..=b'6'] => ContentKind::Heading(level - b'0'),
                _ => ContentKind::Other,
            },
        }
    }

    /// Whether this kind is a heading of any level
    pub fn is_heading(&self) -> bool {
        matches!(self, ContentKind::Heading(_))
    }
}

/// A single node of the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Lower-cased element name, `#text`, or `#document`
    pub tag: String,
    /// Text of a text node (always `None` for elements)
    pub text: Option<String>,
    /// Element attributes, entity-decoded
    pub attributes: BTreeMap<String, String>,
    /// Anchor taken from the `id` attribute
    pub anchor: Option<AnchorId>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
}

impl Node {
    pub(crate) fn element(tag: String, attributes: BTreeMap<String, String>) -> Self {
        let anchor = attributes
            .get("id")
            .filter(|id| !id.is_empty())
            .map(|id| AnchorId::new(id.clone()));
        Self {
            tag,
            text: None,
            attributes,
            anchor,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn text(text: String) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: Some(text),
            attributes: BTreeMap::new(),
            anchor: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn document() -> Self {
        Self::element(DOCUMENT_TAG.to_string(), BTreeMap::new())
    }

    /// Structural role of this node
    pub fn kind(&self) -> ContentKind {
        ContentKind::from_tag(&self.tag)
    }

    /// Whether this is a text node
    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Whether this is an element (including the synthetic root)
    pub fn is_element(&self) -> bool {
        !self.is_text()
    }

    /// Get an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Child nodes in document order
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }
}
