//! Integration tests for document and spreadsheet editing
//!
//! Each test scripts the service's answers on an in-memory transport, drives
//! the public API the way a caller would, and checks both the requests sent
//! and the local state left behind.

use content_tree::ContentTree;
use edit_engine::{
    AnyThread, CopyOptions, Document, EditError, Format, NewThread, Spreadsheet, Thread,
};
use indexmap::IndexMap;
use proptest::prelude::*;
use remote_client::{ClientConfig, ClientError, FormFields, MemoryTransport, RemoteClient, ThreadKind};
use serde_json::json;
use sheet_model::CellValue;
use std::sync::Arc;
use std::time::Duration;

/// A client over a scripted transport
struct Service {
    client: Arc<RemoteClient>,
    transport: Arc<MemoryTransport>,
}

impl Service {
    fn new() -> Self {
        let transport = Arc::new(MemoryTransport::new());
        let config = ClientConfig::new("secret")
            .with_base_url("https://quip.test")
            .with_backoff(Duration::ZERO, 2);
        Self {
            client: Arc::new(RemoteClient::with_transport(config, transport.clone())),
            transport,
        }
    }

    /// Script `GET threads/{id}` followed by one page of markup
    fn script_thread(&self, id: &str, title: &str, kind: &str, html: &str) {
        self.transport
            .push_json(json!({"thread": {"id": id, "title": title, "type": kind}}));
        self.transport
            .push_json(json!({"html": html, "response_metadata": {"next_cursor": ""}}));
    }

    fn script_edit(&self, html: &str) {
        self.transport.push_json(json!({"html": html}));
    }

    /// Form fields of every POST sent so far
    fn posted(&self) -> Vec<Vec<(String, String)>> {
        self.transport
            .requests()
            .iter()
            .filter_map(|r| r.body.as_deref().map(FormFields::decode))
            .collect()
    }

    fn last_posted(&self) -> Vec<(String, String)> {
        self.posted().pop().unwrap_or_default()
    }
}

fn field(fields: &[(String, String)], name: &str) -> Option<String> {
    fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.clone())
}

const LEDGER: &str = r#"<table id="t" title="Ledger">
    <tr id="h"><td id="h0"></td><td id="h1">Date</td><td id="h2">Amount</td></tr>
    <tr id="r1"><td id="a0">1</td><td id="a1">4/1/2014</td><td id="a2">1.00</td></tr>
</table>"#;

const ACCOUNTS: &str = r#"<table id="t" title="Accounts">
    <tr id="h"><td id="h0"></td><td id="h1">Customer</td><td id="h2">Billed</td></tr>
    <tr id="r1"><td id="a0">1</td><td id="a1">Globex</td><td id="a2">5/1/2015</td></tr>
</table>"#;

// ================== Content Fetch ==================

#[test]
fn test_open_concatenates_paginated_markup() {
    let service = Service::new();
    service
        .transport
        .push_json(json!({"thread": {"id": "D", "title": "Notes", "type": "document"}}));
    service
        .transport
        .push_json(json!({"html": "<p>a</p>", "response_metadata": {"next_cursor": "next"}}));
    service
        .transport
        .push_json(json!({"html": "<p>b</p>", "response_metadata": {"next_cursor": ""}}));

    let thread = Thread::open(service.client.clone(), "D").unwrap();
    assert_eq!(thread.snapshot(), Some("<html><p>a</p><p>b</p></html>"));
    assert_eq!(thread.tree().unwrap().find_all_by_tag("p").len(), 2);

    let auth = service.transport.requests()[0].header("Authorization").map(str::to_string);
    assert_eq!(auth.as_deref(), Some("Bearer secret"));
}

#[test]
fn test_empty_thread_is_degraded_not_fatal() {
    let service = Service::new();
    service.script_thread("D", "Blank", "document", "");

    let thread = Thread::open(service.client.clone(), "D").unwrap();
    assert_eq!(thread.snapshot(), None);
    assert_eq!(thread.title(), "Blank");
    assert!(thread.is_corrupted());
}

// ================== Document Edits ==================

#[test]
fn test_anchor_separator_is_rewritten() {
    let service = Service::new();
    service.script_thread("D", "Notes", "document", r#"<p id="12;34">old</p>"#);
    let mut document = Document::open(service.client.clone(), "D").unwrap();

    service.script_edit(r#"<p id="12;34">new</p>"#);
    document.replace_section("12;34", "new", Format::Markdown).unwrap();

    let sent = service.last_posted();
    assert_eq!(field(&sent, "section_id").as_deref(), Some("12_34"));
    assert_eq!(field(&sent, "thread_id").as_deref(), Some("D"));
    assert_eq!(field(&sent, "location").as_deref(), Some("4"));
}

#[test]
fn test_corrupted_markup_recovers_on_reload() {
    let service = Service::new();
    service.script_thread("D", "Notes", "document", r#"<ul id="l"><li id="i">x</li><!-- cut"#);
    let mut document = Document::open(service.client.clone(), "D").unwrap();

    assert_eq!(document.thread().title(), "Notes");
    assert!(matches!(document.lists(), Err(EditError::Corrupted(_))));
    assert!(matches!(
        document.add_after_list("l", "y", Format::Markdown),
        Err(EditError::Corrupted(_))
    ));

    service
        .transport
        .push_json(json!({"html": r#"<ul id="l"><li id="i">x</li></ul>"#}));
    document.thread_mut().reload().unwrap();
    assert_eq!(document.lists().unwrap().len(), 1);
}

#[test]
fn test_refused_delete_is_retried_as_blank_replace() {
    let service = Service::new();
    service.script_thread("D", "Notes", "document", r#"<ul id="l"><li id="i1">a</li><li id="i2">b</li></ul>"#);
    let mut document = Document::open(service.client.clone(), "D").unwrap();

    service.transport.push_error(400, "Invalid location for delete");
    service.script_edit(r#"<ul id="l"><li id="i1">a</li><li id="i2"> </li></ul>"#);
    document.delete_list_item("l", -1).unwrap();

    let posted = service.posted();
    assert_eq!(posted.len(), 2);
    assert_eq!(field(&posted[0], "location").as_deref(), Some("5"));
    assert_eq!(field(&posted[1], "location").as_deref(), Some("4"));
    assert_eq!(field(&posted[1], "section_id").as_deref(), Some("i2"));
    assert_eq!(field(&posted[1], "content").as_deref(), Some(" "));
}

#[test]
fn test_rejected_edit_surfaces_remote_message() {
    let service = Service::new();
    service.script_thread("D", "Notes", "document", r#"<p id="p">x</p>"#);
    let mut document = Document::open(service.client.clone(), "D").unwrap();
    let before = document.thread().snapshot().map(str::to_string);

    service.transport.push_error(403, "Not allowed to edit");
    let err = document.add_to_end("y", Format::Markdown).unwrap_err();
    match err {
        EditError::Client(ClientError::Remote { code, message }) => {
            assert_eq!(code, 403);
            assert_eq!(message, "Not allowed to edit");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(document.thread().snapshot().map(str::to_string), before);
}

#[test]
fn test_timeouts_exhaust_retries() {
    let service = Service::new();
    service.script_thread("D", "Notes", "document", r#"<p id="p">x</p>"#);
    let mut document = Document::open(service.client.clone(), "D").unwrap();

    for _ in 0..3 {
        service.transport.push_timeout();
    }
    let err = document.add_to_start("y", Format::Markdown).unwrap_err();
    assert!(matches!(err, EditError::Client(ClientError::Timeout { attempts: 3 })));
    assert!(document.thread().tree().unwrap().find_by_anchor("p").is_some());
}

// ================== Spreadsheet Edits ==================

#[test]
fn test_mapping_row_follows_header_order() {
    let service = Service::new();
    service.script_thread("S", "Books", "spreadsheet", LEDGER);
    let mut sheets = Spreadsheet::open(service.client.clone(), "S").unwrap();

    let mut row = IndexMap::new();
    row.insert("Amount".to_string(), CellValue::from(2.24));
    row.insert("Date".to_string(), CellValue::from("5/1/2014"));
    service.script_edit(LEDGER);
    sheets.append_row(Some("Ledger"), row).unwrap();

    let sent = service.last_posted();
    assert_eq!(
        field(&sent, "content").as_deref(),
        Some("<tr><td>5/1/2014</td><td>2.24</td></tr>")
    );
    assert_eq!(field(&sent, "section_id").as_deref(), Some("r1"));
    assert_eq!(field(&sent, "format").as_deref(), Some("html"));
}

#[test]
fn test_search_update_without_match_adds_row() {
    let service = Service::new();
    service.script_thread("S", "Billing", "spreadsheet", ACCOUNTS);
    let mut sheets = Spreadsheet::open(service.client.clone(), "S").unwrap();

    let mut updates = IndexMap::new();
    updates.insert("Billed".to_string(), CellValue::from("6/24/2015"));
    service.script_edit(ACCOUNTS);
    let response = sheets
        .search_update_cells(None, ("customer", "Acme"), &updates)
        .unwrap();
    assert!(response.is_some());

    let sent = service.last_posted();
    assert_eq!(
        field(&sent, "content").as_deref(),
        Some("<tr><td>Acme</td><td>6/24/2015</td></tr>")
    );
    assert_eq!(field(&sent, "location").as_deref(), Some("2"));
}

#[test]
fn test_cell_values_are_escaped() {
    let service = Service::new();
    service.script_thread("S", "Billing", "spreadsheet", ACCOUNTS);
    let mut sheets = Spreadsheet::open(service.client.clone(), "S").unwrap();

    service.script_edit(ACCOUNTS);
    sheets
        .append_row(None, vec![CellValue::from("A & B <Ltd>"), CellValue::from(true)])
        .unwrap();
    assert_eq!(
        field(&service.last_posted(), "content").as_deref(),
        Some("<tr><td>A &amp; B &lt;Ltd&gt;</td><td>true</td></tr>")
    );
}

// ================== Thread Lifecycle ==================

#[test]
fn test_create_copy_and_delete() {
    let service = Service::new();
    service.transport.push_json(json!({
        "thread": {"id": "N", "title": "Plan", "type": "document"},
        "html": "<h1 id=\"h\">Plan</h1>"
    }));
    let members = vec!["U1".to_string()];
    let thread = Thread::create(
        service.client.clone(),
        &NewThread::document("# Plan").with_members(members),
    )
    .unwrap();
    assert_eq!(thread.kind(), ThreadKind::Document);
    assert!(thread.tree().unwrap().find_by_anchor("h").is_some());
    let created = service.last_posted();
    assert_eq!(field(&created, "format").as_deref(), Some("markdown"));
    assert_eq!(field(&created, "member_ids").as_deref(), Some("U1"));
    assert!(field(&created, "title").is_none());

    service.transport.push_json(json!({"thread": {"id": "C"}}));
    service.script_thread("C", "Plan v2", "document", "<h1 id=\"h\">Plan</h1>");
    let options = CopyOptions {
        title: Some("Plan v2".to_string()),
        folder_ids: vec!["F1".to_string()],
        ..Default::default()
    };
    let copy = thread.copy(&options).unwrap();
    assert_eq!(copy.title(), "Plan v2");
    let copied = &service.posted()[1];
    assert_eq!(field(copied, "title").as_deref(), Some("Plan v2"));
    assert_eq!(field(copied, "folder_ids").as_deref(), Some("F1"));

    service.transport.push_json(json!({}));
    copy.delete().unwrap();
    assert_eq!(
        service.transport.last_request().unwrap().path(),
        "/1/threads/delete"
    );
}

#[test]
fn test_open_dispatches_on_kind() {
    let service = Service::new();
    service.script_thread("S", "Billing", "spreadsheet", ACCOUNTS);
    let thread = AnyThread::open(service.client.clone(), "S").unwrap();
    let sheets = thread.as_spreadsheet().unwrap();
    assert_eq!(sheets.sheet_names().unwrap(), vec!["Accounts"]);

    service.script_thread("X", "Chat", "chat", "<p>hi</p>");
    let chat = AnyThread::open(service.client.clone(), "X").unwrap();
    assert!(!chat.has_content_tree());
}

// ================== Properties ==================

proptest! {
    #[test]
    fn prop_tree_matches_returned_markup(count in 1usize..12, target in 0usize..12) {
        prop_assume!(target < count);
        let service = Service::new();
        service.script_thread("D", "Notes", "document", r#"<p id="p0">start</p>"#);
        let mut document = Document::open(service.client.clone(), "D").unwrap();

        let returned: String = (0..count)
            .map(|i| format!(r#"<p id="p{}">para {}</p>"#, i, i))
            .collect();
        service.script_edit(&returned);
        document.add_after_section("p0", "para", Format::Markdown).unwrap();

        let expected = ContentTree::parse(&returned).unwrap();
        let tree = document.thread().tree().unwrap();
        prop_assert_eq!(tree.len(), expected.len());
        let anchor = format!("p{}", target);
        prop_assert_eq!(
            tree.find_by_anchor(&anchor).map(|n| tree.text_content(n)),
            expected.find_by_anchor(&anchor).map(|n| expected.text_content(n))
        );
    }
}
