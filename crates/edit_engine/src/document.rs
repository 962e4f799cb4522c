//! Rich-text document operations
//!
//! Sections are anchored elements, ranges are heading-delimited spans the
//! service matches by heading text, and list operations address items by
//! position within the list.

use crate::{Format, Result, Thread};
use address_resolver::{list_item_anchors, resolve_list_item, ListPosition, LogicalAddress, Relation};
use content_tree::{AnchorId, ContentKind};
use remote_client::{RemoteClient, ThreadResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A heading and the text that names its range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingInfo {
    pub anchor: Option<AnchorId>,
    pub level: u8,
    pub text: String,
}

/// A rich-text thread
#[derive(Debug)]
pub struct Document {
    thread: Thread,
}

impl From<Thread> for Document {
    fn from(thread: Thread) -> Self {
        Self { thread }
    }
}

impl Document {
    pub fn open(client: Arc<RemoteClient>, thread_id: &str) -> Result<Self> {
        Thread::open(client, thread_id).map(Self::from)
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn thread_mut(&mut self) -> &mut Thread {
        &mut self.thread
    }

    pub fn into_thread(self) -> Thread {
        self.thread
    }

    /// Edit at a logical address
    pub fn edit_at(&mut self, content: &str, address: &LogicalAddress, format: Format) -> Result<ThreadResponse> {
        self.thread.edit(content, address, format)
    }

    pub fn add_to_start(&mut self, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::start(), format)
    }

    pub fn add_to_end(&mut self, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::end(), format)
    }

    pub fn add_after_section(&mut self, anchor: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::anchor(anchor, Relation::After), format)
    }

    pub fn add_before_section(&mut self, anchor: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::anchor(anchor, Relation::Before), format)
    }

    pub fn replace_section(&mut self, anchor: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::anchor(anchor, Relation::Replace), format)
    }

    pub fn delete_section(&mut self, anchor: &str) -> Result<ThreadResponse> {
        self.edit_at("", &LogicalAddress::anchor(anchor, Relation::Delete), Format::Markdown)
    }

    pub fn add_after_range(&mut self, heading: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::range(heading, Relation::After), format)
    }

    pub fn add_before_range(&mut self, heading: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::range(heading, Relation::Before), format)
    }

    pub fn replace_range(&mut self, heading: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        self.edit_at(content, &LogicalAddress::range(heading, Relation::Replace), format)
    }

    pub fn delete_range(&mut self, heading: &str) -> Result<ThreadResponse> {
        self.edit_at("", &LogicalAddress::range(heading, Relation::Delete), Format::Markdown)
    }

    /// Anchors of every `ul`/`ol` carrying one, in document order
    pub fn lists(&self) -> Result<Vec<AnchorId>> {
        let tree = self.thread.tree()?;
        Ok(tree
            .lists()
            .into_iter()
            .filter_map(|list| tree.anchor(list).cloned())
            .collect())
    }

    /// Every heading, in document order
    pub fn headings(&self) -> Result<Vec<HeadingInfo>> {
        let tree = self.thread.tree()?;
        Ok(tree
            .headings()
            .into_iter()
            .map(|heading| HeadingInfo {
                anchor: tree.anchor(heading).cloned(),
                level: match tree.kind(heading) {
                    Some(ContentKind::Heading(level)) => level,
                    _ => 0,
                },
                text: tree.text_content(heading),
            })
            .collect())
    }

    /// Item anchors of a list; empty when the list is missing
    pub fn list_items(&self, list: &str) -> Result<Vec<Option<AnchorId>>> {
        Ok(list_item_anchors(self.thread.tree()?, list))
    }

    /// Anchor of a list item, `None` when it cannot be addressed
    pub fn list_item(&self, list: &str, position: ListPosition) -> Result<Option<AnchorId>> {
        Ok(resolve_list_item(self.thread.tree()?, list, position))
    }

    /// Add after the last item of the list
    pub fn add_after_list(&mut self, list: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        let address = LogicalAddress::list_item(list, ListPosition::Last, Relation::After);
        self.edit_at(content, &address, format)
    }

    /// Add before the first item of the list
    pub fn add_before_list(&mut self, list: &str, content: &str, format: Format) -> Result<ThreadResponse> {
        let address = LogicalAddress::list_item(list, ListPosition::First, Relation::Before);
        self.edit_at(content, &address, format)
    }

    pub fn insert_after_list_item(
        &mut self,
        list: &str,
        index: isize,
        content: &str,
        format: Format,
    ) -> Result<ThreadResponse> {
        let address = LogicalAddress::list_item(list, ListPosition::Nth(index), Relation::After);
        self.edit_at(content, &address, format)
    }

    pub fn insert_before_list_item(
        &mut self,
        list: &str,
        index: isize,
        content: &str,
        format: Format,
    ) -> Result<ThreadResponse> {
        let address = LogicalAddress::list_item(list, ListPosition::Nth(index), Relation::Before);
        self.edit_at(content, &address, format)
    }

    pub fn replace_list_item(
        &mut self,
        list: &str,
        index: isize,
        content: &str,
        format: Format,
    ) -> Result<ThreadResponse> {
        let address = LogicalAddress::list_item(list, ListPosition::Nth(index), Relation::Replace);
        self.edit_at(content, &address, format)
    }

    pub fn delete_list_item(&mut self, list: &str, index: isize) -> Result<ThreadResponse> {
        let address = LogicalAddress::list_item(list, ListPosition::Nth(index), Relation::Delete);
        self.edit_at("", &address, Format::Markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditError;
    use remote_client::{ClientConfig, FormFields, MemoryTransport, ThreadMeta};
    use serde_json::json;
    use std::time::Duration;

    const DOC: &str = r#"<html>
        <h1 id="h1">Plan</h1>
        <p id="p1">Intro</p>
        <h2 id="h2">Tasks <b>now</b></h2>
        <ul id="todo"><li id="t1">write</li><li id="t2">test</li><li id="t3">ship</li></ul>
        <ol><li id="n1">unanchored list</li></ol>
    </html>"#;

    fn document() -> (Document, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new());
        let config = ClientConfig::new("t").with_backoff(Duration::ZERO, 2);
        let client = Arc::new(RemoteClient::with_transport(config, transport.clone()));
        let meta = ThreadMeta {
            id: "D".to_string(),
            title: "Plan".to_string(),
            ..Default::default()
        };
        let thread = Thread::from_parts(client, meta, Some(DOC.to_string()));
        (Document::from(thread), transport)
    }

    fn sent(transport: &MemoryTransport) -> Vec<(String, String)> {
        let request = transport.last_request().unwrap();
        FormFields::decode(request.body.as_deref().unwrap())
    }

    fn field(fields: &[(String, String)], name: &str) -> Option<String> {
        fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_lists_and_headings() {
        let (doc, _) = document();
        let lists: Vec<_> = doc.lists().unwrap().into_iter().map(AnchorId::into_string).collect();
        assert_eq!(lists, vec!["todo"]);

        let headings = doc.headings().unwrap();
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[0].text, "Plan");
        assert_eq!(headings[1].level, 2);
        assert_eq!(headings[1].text, "Tasks now");
    }

    #[test]
    fn test_list_item_reads() {
        let (doc, _) = document();
        assert_eq!(doc.list_items("todo").unwrap().len(), 3);
        assert_eq!(
            doc.list_item("todo", ListPosition::Nth(-2)).unwrap().unwrap().as_str(),
            "t2"
        );
        assert!(doc.list_item("todo", ListPosition::Nth(3)).unwrap().is_none());
        assert!(doc.list_items("missing").unwrap().is_empty());
    }

    #[test]
    fn test_add_after_list_targets_last_item() {
        let (mut doc, transport) = document();
        transport.push_json(json!({"html": DOC}));
        doc.add_after_list("todo", "celebrate", Format::Markdown).unwrap();
        let fields = sent(&transport);
        assert_eq!(field(&fields, "section_id").as_deref(), Some("t3"));
        assert_eq!(field(&fields, "location").as_deref(), Some("2"));
        assert_eq!(field(&fields, "content").as_deref(), Some("celebrate"));
    }

    #[test]
    fn test_add_before_list_targets_first_item() {
        let (mut doc, transport) = document();
        transport.push_json(json!({"html": DOC}));
        doc.add_before_list("todo", "plan", Format::Markdown).unwrap();
        let fields = sent(&transport);
        assert_eq!(field(&fields, "section_id").as_deref(), Some("t1"));
        assert_eq!(field(&fields, "location").as_deref(), Some("3"));
    }

    #[test]
    fn test_list_item_edits() {
        let (mut doc, transport) = document();
        transport.push_json(json!({"html": DOC}));
        doc.replace_list_item("todo", 1, "<li>verify</li>", Format::Html).unwrap();
        let fields = sent(&transport);
        assert_eq!(field(&fields, "section_id").as_deref(), Some("t2"));
        assert_eq!(field(&fields, "location").as_deref(), Some("4"));
        assert_eq!(field(&fields, "format").as_deref(), Some("html"));

        transport.push_json(json!({"html": DOC}));
        doc.delete_list_item("todo", -1).unwrap();
        let fields = sent(&transport);
        assert_eq!(field(&fields, "section_id").as_deref(), Some("t3"));
        assert_eq!(field(&fields, "location").as_deref(), Some("5"));
        assert_eq!(field(&fields, "content").as_deref(), Some(" "));
    }

    #[test]
    fn test_out_of_range_item_sends_nothing() {
        let (mut doc, transport) = document();
        let err = doc
            .insert_after_list_item("todo", 7, "x", Format::Markdown)
            .unwrap_err();
        assert!(matches!(err, EditError::AddressNotFound(_)));
        let err = doc.add_after_list("nope", "x", Format::Markdown).unwrap_err();
        assert!(matches!(err, EditError::AddressNotFound(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_section_edits_require_known_anchor() {
        let (mut doc, transport) = document();
        assert!(matches!(
            doc.replace_section("zz", "x", Format::Markdown),
            Err(EditError::AddressNotFound(_))
        ));
        transport.push_json(json!({"html": DOC}));
        doc.add_before_section("p1", "Summary", Format::Markdown).unwrap();
        assert_eq!(field(&sent(&transport), "location").as_deref(), Some("3"));
    }

    #[test]
    fn test_range_edits() {
        let (mut doc, transport) = document();
        transport.push_json(json!({"html": DOC}));
        doc.add_after_range("Tasks;now", "More", Format::Markdown).unwrap();
        let fields = sent(&transport);
        assert_eq!(field(&fields, "document_range").as_deref(), Some("Tasks_now"));
        assert_eq!(field(&fields, "location").as_deref(), Some("6"));

        transport.push_json(json!({"html": DOC}));
        doc.delete_range("Plan").unwrap();
        assert_eq!(field(&sent(&transport), "location").as_deref(), Some("9"));
    }

    #[test]
    fn test_document_edges() {
        let (mut doc, transport) = document();
        transport.push_json(json!({"html": DOC}));
        doc.add_to_start("# Top", Format::Markdown).unwrap();
        let fields = sent(&transport);
        assert_eq!(field(&fields, "location").as_deref(), Some("1"));
        assert!(field(&fields, "section_id").is_none());
    }
}
