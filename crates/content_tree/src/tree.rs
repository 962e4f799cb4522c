//! Content tree storage and structural queries

use crate::{AnchorId, ContentKind, HtmlParser, Node, NodeIndex, Result};
use std::collections::HashMap;

/// A fully materialized content tree.
///
/// Nodes live in an arena in document (pre-order) order, so iterating the
/// arena slice is a document-order walk. Every query reads the whole tree;
/// there is no lazy traversal.
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<Node>,
    anchors: HashMap<AnchorId, NodeIndex>,
}

impl ContentTree {
    /// Create a tree holding only the synthetic document root
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            anchors: HashMap::new(),
        }
    }

    /// Parse markup into a tree
    pub fn parse(markup: &str) -> Result<Self> {
        HtmlParser::new().parse(markup)
    }

    /// Append a node under `parent`, returning its index
    pub(crate) fn append(&mut self, parent: NodeIndex, mut node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        node.parent = Some(parent);
        if let Some(anchor) = &node.anchor {
            // first occurrence wins
            self.anchors.entry(anchor.clone()).or_insert(index);
        }
        self.nodes.push(node);
        self.nodes[parent.0].children.push(index);
        index
    }

    /// The synthetic document root
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but its root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Get a node by index
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0)
    }

    /// Tag of a node (empty for an unknown index)
    pub fn tag(&self, index: NodeIndex) -> &str {
        self.node(index).map(|n| n.tag.as_str()).unwrap_or("")
    }

    /// Structural role of a node
    pub fn kind(&self, index: NodeIndex) -> Option<ContentKind> {
        self.node(index).map(Node::kind)
    }

    /// Anchor of a node, if it carries one
    pub fn anchor(&self, index: NodeIndex) -> Option<&AnchorId> {
        self.node(index).and_then(|n| n.anchor.as_ref())
    }

    /// Attribute value of a node
    pub fn attribute(&self, index: NodeIndex, name: &str) -> Option<&str> {
        self.node(index).and_then(|n| n.attribute(name))
    }

    /// Children of a node, including text nodes
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.node(index).map(Node::children).unwrap_or(&[])
    }

    /// Element children of a node, skipping text
    pub fn element_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.children(index)
            .iter()
            .copied()
            .filter(|&child| self.nodes[child.0].is_element())
            .collect()
    }

    /// The node and all of its descendants in document order
    pub fn descendants(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut result = Vec::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            result.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        result
    }

    /// The node and its descendants whose tag matches
    pub fn descendants_by_tag(&self, index: NodeIndex, tag: &str) -> Vec<NodeIndex> {
        self.descendants(index)
            .into_iter()
            .filter(|&i| self.nodes[i.0].tag == tag)
            .collect()
    }

    /// All elements with the given tag in document order
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.tag == tag)
            .map(|(i, _)| NodeIndex(i))
            .collect()
    }

    /// The element carrying the given anchor
    pub fn find_by_anchor(&self, anchor: &str) -> Option<NodeIndex> {
        self.anchors.get(&AnchorId::from(anchor)).copied()
    }

    /// The first element whose attribute `name` equals `value`
    pub fn find_first_matching_attribute(&self, name: &str, value: &str) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(|node| node.attribute(name) == Some(value))
            .map(NodeIndex)
    }

    /// Text of the first text node at or below `index`
    pub fn first_text(&self, index: NodeIndex) -> Option<&str> {
        self.descendants(index)
            .into_iter()
            .find_map(|i| self.nodes[i.0].text.as_deref())
    }

    /// Concatenated text of every text node at or below `index`
    pub fn text_content(&self, index: NodeIndex) -> String {
        self.descendants(index)
            .into_iter()
            .filter_map(|i| self.nodes[i.0].text.as_deref())
            .collect()
    }

    /// All list elements (`ul`/`ol`) in document order
    pub fn lists(&self) -> Vec<NodeIndex> {
        self.nodes_of_kind(|kind| kind == ContentKind::List)
    }

    /// All headings (`h1`..`h6`) in document order
    pub fn headings(&self) -> Vec<NodeIndex> {
        self.nodes_of_kind(|kind| kind.is_heading())
    }

    fn nodes_of_kind(&self, predicate: impl Fn(ContentKind) -> bool) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| predicate(node.kind()))
            .map(|(i, _)| NodeIndex(i))
            .collect()
    }
}
