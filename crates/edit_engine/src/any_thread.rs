//! Kind-dispatched threads and title search

use crate::{Document, EditError, Result, Spreadsheet, Thread};
use indexmap::IndexMap;
use remote_client::{RemoteClient, ThreadKind};
use std::sync::Arc;

/// A thread wrapped according to the kind the service reports
#[derive(Debug)]
pub enum AnyThread {
    Document(Document),
    Spreadsheet(Spreadsheet),
    /// Chats, slides and other kinds: identity only
    Generic(Thread),
}

impl From<Thread> for AnyThread {
    fn from(thread: Thread) -> Self {
        match thread.kind() {
            ThreadKind::Document => AnyThread::Document(Document::from(thread)),
            ThreadKind::Spreadsheet => AnyThread::Spreadsheet(Spreadsheet::from(thread)),
            ThreadKind::Other => AnyThread::Generic(thread),
        }
    }
}

impl AnyThread {
    pub fn open(client: Arc<RemoteClient>, thread_id: &str) -> Result<Self> {
        Thread::open(client, thread_id).map(Self::from)
    }

    pub fn thread(&self) -> &Thread {
        match self {
            AnyThread::Document(document) => document.thread(),
            AnyThread::Spreadsheet(spreadsheet) => spreadsheet.thread(),
            AnyThread::Generic(thread) => thread,
        }
    }

    pub fn into_thread(self) -> Thread {
        match self {
            AnyThread::Document(document) => document.into_thread(),
            AnyThread::Spreadsheet(spreadsheet) => spreadsheet.into_thread(),
            AnyThread::Generic(thread) => thread,
        }
    }

    pub fn has_content_tree(&self) -> bool {
        !matches!(self, AnyThread::Generic(_))
    }

    pub fn has_sheet_model(&self) -> bool {
        matches!(self, AnyThread::Spreadsheet(_))
    }

    /// The document, or `UnsupportedThread` for any other kind
    pub fn into_document(self) -> Result<Document> {
        match self {
            AnyThread::Document(document) => Ok(document),
            other => Err(other.unsupported("document")),
        }
    }

    /// The spreadsheet, or `UnsupportedThread` for any other kind
    pub fn into_spreadsheet(self) -> Result<Spreadsheet> {
        match self {
            AnyThread::Spreadsheet(spreadsheet) => Ok(spreadsheet),
            other => Err(other.unsupported("spreadsheet")),
        }
    }

    fn unsupported(&self, wanted: &str) -> EditError {
        let thread = self.thread();
        EditError::UnsupportedThread(format!(
            "{} is a {}, not a {}",
            thread.id(),
            thread.kind().as_str(),
            wanted
        ))
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            AnyThread::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn as_spreadsheet(&self) -> Option<&Spreadsheet> {
        match self {
            AnyThread::Spreadsheet(spreadsheet) => Some(spreadsheet),
            _ => None,
        }
    }
}

/// Open the best title match for `title`, if any
pub fn search(client: Arc<RemoteClient>, title: &str) -> Result<Option<AnyThread>> {
    let hit = client.search(title, Some(1), true)?.into_iter().next();
    match hit {
        Some(meta) => {
            tracing::info!("Search for {:?} matched {}", title, meta.id);
            AnyThread::open(client, &meta.id).map(Some)
        }
        None => Ok(None),
    }
}

/// Title → id of the threads matching `query`, best match first
pub fn search_titles(
    client: &RemoteClient,
    query: &str,
    search_content: bool,
    count: Option<u32>,
) -> Result<IndexMap<String, String>> {
    Ok(client
        .search(query, count, !search_content)?
        .into_iter()
        .map(|meta| (meta.title, meta.id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote_client::{ClientConfig, MemoryTransport, ThreadMeta};
    use serde_json::json;
    use std::time::Duration;

    fn client() -> (Arc<RemoteClient>, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new());
        let config = ClientConfig::new("t").with_backoff(Duration::ZERO, 2);
        (
            Arc::new(RemoteClient::with_transport(config, transport.clone())),
            transport,
        )
    }

    fn thread(client: &Arc<RemoteClient>, kind: ThreadKind) -> Thread {
        let meta = ThreadMeta {
            id: "T".to_string(),
            kind,
            ..Default::default()
        };
        Thread::from_parts(client.clone(), meta, Some("<p id=\"p\">x</p>".to_string()))
    }

    #[test]
    fn test_dispatch_by_kind() {
        let (client, _) = client();
        let document = AnyThread::from(thread(&client, ThreadKind::Document));
        assert!(document.has_content_tree());
        assert!(!document.has_sheet_model());
        assert!(document.as_document().is_some());

        let spreadsheet = AnyThread::from(thread(&client, ThreadKind::Spreadsheet));
        assert!(spreadsheet.has_sheet_model());
        assert!(spreadsheet.as_spreadsheet().is_some());

        let other = AnyThread::from(thread(&client, ThreadKind::Other));
        assert!(!other.has_content_tree());
        assert_eq!(other.thread().id(), "T");
        assert!(matches!(
            other.into_spreadsheet(),
            Err(EditError::UnsupportedThread(_))
        ));
        assert!(document.into_document().is_ok());
    }

    #[test]
    fn test_search_opens_best_match() {
        let (client, transport) = client();
        transport.push_json(json!([{"thread": {"id": "S1", "title": "Budget", "type": "spreadsheet"}}]));
        transport.push_json(json!({"thread": {"id": "S1", "title": "Budget", "type": "spreadsheet"}}));
        transport.push_json(json!({"html": "<table title=\"Q1\"></table>"}));

        let found = search(client, "Budget").unwrap().unwrap();
        assert!(found.has_sheet_model());
        assert_eq!(found.thread().title(), "Budget");
        assert_eq!(
            transport.requests()[0].path(),
            "/1/threads/search?query=Budget&count=1&only_match_titles=true"
        );
    }

    #[test]
    fn test_search_without_match() {
        let (client, transport) = client();
        transport.push_json(json!([]));
        assert!(search(client, "Nothing").unwrap().is_none());
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_search_titles() {
        let (client, transport) = client();
        transport.push_json(json!([
            {"thread": {"id": "A", "title": "Alpha"}},
            {"thread": {"id": "B", "title": "Beta"}}
        ]));
        let titles = search_titles(&client, "a", true, Some(10)).unwrap();
        assert_eq!(titles.get_index(0), Some((&"Alpha".to_string(), &"A".to_string())));
        assert_eq!(titles["Beta"], "B");
        assert_eq!(
            transport.last_request().unwrap().path(),
            "/1/threads/search?query=a&count=10&only_match_titles=false"
        );
    }
}
