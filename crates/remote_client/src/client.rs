//! Remote client: request building, retry and typed API calls

use crate::{
    ClientConfig, ClientError, FormFields, HttpRequest, HttpResponse, HttpTransport, Result,
    ThreadKind, ThreadMeta, ThreadResponse, Transport, TransportError,
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Parameters of a new thread
#[derive(Debug, Clone, Copy)]
pub struct NewDocument<'a> {
    pub content: &'a str,
    /// `html` or `markdown`
    pub format: &'a str,
    /// Inferred by the service from the first heading when absent
    pub title: Option<&'a str>,
    /// Users and folders given access; empty means the caller's private folder
    pub member_ids: &'a [String],
    pub kind: ThreadKind,
}

/// Parameters of a thread copy
#[derive(Debug, Clone, Copy)]
pub struct CopyDocument<'a> {
    pub thread_id: &'a str,
    pub title: &'a str,
    pub folder_ids: &'a [String],
    pub member_ids: &'a [String],
    pub copy_annotations: bool,
}

/// Client for the remote document service.
///
/// Holds no mutable state; share it between threads through `Arc`.
pub struct RemoteClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
}

impl fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct HtmlPage {
    #[serde(default)]
    html: String,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    thread: ThreadMeta,
}

impl RemoteClient {
    /// Create a client over HTTP
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over HTTP configured from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Create a client over any transport
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{base}/{version}/{path}?{query}`, the query omitted when empty
    pub fn url(&self, version: u8, path: &str, query: &FormFields) -> String {
        let mut url = format!("{}/{}/{}", self.config.base_url, version, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }
        url
    }

    /// Issue a request and decode its JSON body.
    ///
    /// With `form` the request is a POST of the encoded fields, otherwise a
    /// GET. Timeouts are retried with growing delay; every other failure is
    /// returned at once.
    pub fn fetch_json(
        &self,
        version: u8,
        path: &str,
        query: &FormFields,
        form: Option<&FormFields>,
    ) -> Result<Value> {
        let url = self.url(version, path, query);
        let mut request = match form {
            Some(form) => HttpRequest::post(url, form.encode()),
            None => HttpRequest::get(url),
        };
        if let Some(token) = &self.config.access_token {
            request = request.with_header("Authorization", &format!("Bearer {}", token));
        }

        let response = self.execute_with_retry(&request)?;
        if !response.is_success() {
            return Err(remote_error(response));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    fn execute_with_retry(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let attempts = self.config.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.transport.execute(request) {
                Ok(response) => {
                    tracing::debug!("{} {} -> {}", request.method, request.path(), response.status);
                    return Ok(response);
                }
                Err(TransportError::Timeout(reason)) => {
                    tracing::warn!(
                        "Attempt {}/{} to {} timed out: {}",
                        attempt,
                        attempts,
                        request.path(),
                        reason
                    );
                    if attempt < attempts {
                        std::thread::sleep(self.backoff_delay(attempt));
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ClientError::Timeout { attempts })
    }

    /// Identity fields of a thread
    pub fn get_thread(&self, thread_id: &str) -> Result<ThreadMeta> {
        let value = self.fetch_json(2, &format!("threads/{}", thread_id), &FormFields::new(), None)?;
        let response: ThreadResponse = serde_json::from_value(value)?;
        response
            .thread
            .ok_or_else(|| ClientError::UnexpectedResponse(format!("no thread for {}", thread_id)))
    }

    /// Full markup of a thread, following pagination cursors.
    ///
    /// Fragments are concatenated and wrapped in `<html>…</html>`; `None` when
    /// the thread has no content.
    pub fn fetch_html(&self, thread_id: &str) -> Result<Option<String>> {
        let path = format!("threads/{}/html", thread_id);
        let mut html = String::new();
        let mut cursor = String::new();
        let mut pages = 0;

        loop {
            let query = FormFields::new().with("cursor", cursor.as_str());
            let page: HtmlPage = serde_json::from_value(self.fetch_json(2, &path, &query, None)?)?;
            html.push_str(&page.html);
            pages += 1;
            match page.response_metadata.next_cursor {
                Some(next) if !next.is_empty() => cursor = next,
                _ => break,
            }
        }

        tracing::debug!("Fetched {} bytes of markup for {} in {} pages", html.len(), thread_id, pages);
        Ok((!html.is_empty()).then(|| format!("<html>{}</html>", html)))
    }

    /// Create a thread
    pub fn new_document(&self, document: &NewDocument<'_>) -> Result<ThreadResponse> {
        let form = FormFields::new()
            .with("content", document.content)
            .with("format", document.format)
            .with_opt("title", document.title)
            .with("member_ids", document.member_ids.join(","))
            .with("type", document.kind.as_str());
        let value = self.fetch_json(1, "threads/new-document", &FormFields::new(), Some(&form))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Apply a positional edit; `form` carries the edit fields
    pub fn edit_document(&self, form: &FormFields) -> Result<ThreadResponse> {
        let value = self.fetch_json(1, "threads/edit-document", &FormFields::new(), Some(form))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Threads matching `query`, best match first
    pub fn search(&self, query: &str, count: Option<u32>, only_match_titles: bool) -> Result<Vec<ThreadMeta>> {
        let params = FormFields::new()
            .with("query", query)
            .with_opt("count", count)
            .with("only_match_titles", only_match_titles);
        let value = self.fetch_json(1, "threads/search", &params, None)?;
        let hits: Vec<SearchHit> = serde_json::from_value(value)?;
        Ok(hits.into_iter().map(|hit| hit.thread).collect())
    }

    /// Copy a thread
    pub fn copy_document(&self, copy: &CopyDocument<'_>) -> Result<ThreadResponse> {
        let form = FormFields::new()
            .with("thread_id", copy.thread_id)
            .with("folder_ids", copy.folder_ids.join(","))
            .with("member_ids", copy.member_ids.join(","))
            .with("title", copy.title)
            .with("copy_annotations", copy.copy_annotations);
        let value = self.fetch_json(1, "threads/copy-document", &FormFields::new(), Some(&form))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Delete a thread
    pub fn delete_thread(&self, thread_id: &str) -> Result<()> {
        let form = FormFields::new().with("thread_id", thread_id);
        self.fetch_json(1, "threads/delete", &FormFields::new(), Some(&form))?;
        Ok(())
    }

    /// Delay before the retry following `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = self
            .config
            .backoff_factor
            .saturating_pow(attempt.saturating_sub(1));
        self.config.initial_backoff.saturating_mul(factor)
    }
}

/// Error for a non-success response: the body's `error_description` when
/// readable, the raw status and body otherwise
fn remote_error(response: HttpResponse) -> ClientError {
    let description = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("error_description")?.as_str().map(str::to_string));
    match description {
        Some(message) => ClientError::Remote {
            code: response.status,
            message,
        },
        None => ClientError::Http {
            status: response.status,
            body: response.body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (RemoteClient, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new());
        let config = ClientConfig::new("token")
            .with_base_url("https://quip.test")
            .with_backoff(Duration::ZERO, 2);
        (RemoteClient::with_transport(config, transport.clone()), transport)
    }

    #[test]
    fn test_url_omits_empty_query() {
        let (client, _) = client();
        assert_eq!(
            client.url(2, "threads/x/html", &FormFields::new().with("cursor", "")),
            "https://quip.test/2/threads/x/html"
        );
        assert_eq!(
            client.url(1, "threads/search", &FormFields::new().with("query", "a b").with("count", 1u32)),
            "https://quip.test/1/threads/search?query=a%20b&count=1"
        );
    }

    #[test]
    fn test_bearer_auth_and_post_body() {
        let (client, transport) = client();
        transport.push_json(json!({}));
        let form = FormFields::new().with("thread_id", "T").with("content", "");
        client.fetch_json(1, "threads/delete", &FormFields::new(), Some(&form)).unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer token"));
        assert_eq!(request.body.as_deref(), Some("thread_id=T"));
    }

    #[test]
    fn test_no_auth_header_without_token() {
        let transport = Arc::new(MemoryTransport::new());
        transport.push_json(json!({}));
        let client = RemoteClient::with_transport(ClientConfig::default(), transport.clone());
        client.fetch_json(1, "x", &FormFields::new(), None).unwrap();
        assert!(transport.last_request().unwrap().header("Authorization").is_none());
    }

    #[test]
    fn test_timeouts_are_retried() {
        let (client, transport) = client();
        transport.push_timeout();
        transport.push_timeout();
        transport.push_json(json!({"ok": true}));
        let value = client.fetch_json(1, "x", &FormFields::new(), None).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_timeouts_exhaust_attempts() {
        let (client, transport) = client();
        for _ in 0..4 {
            transport.push_timeout();
        }
        let err = client.fetch_json(1, "x", &FormFields::new(), None).unwrap_err();
        assert!(matches!(err, ClientError::Timeout { attempts: 3 }));
        assert_eq!(transport.request_count(), 3);
        assert_eq!(transport.pending(), 1);
    }

    #[test]
    fn test_other_failures_are_not_retried() {
        let (client, transport) = client();
        transport.push_error(403, "Forbidden thread");
        transport.push_json(json!({}));
        let err = client.fetch_json(1, "x", &FormFields::new(), None).unwrap_err();
        match err {
            ClientError::Remote { code, message } => {
                assert_eq!(code, 403);
                assert_eq!(message, "Forbidden thread");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_unreadable_error_body_is_surfaced_raw() {
        let (client, transport) = client();
        transport.push_response(502, "<html>Bad gateway</html>");
        let err = client.fetch_json(1, "x", &FormFields::new(), None).unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 502, .. }));
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_fetch_html_concatenates_pages() {
        let (client, transport) = client();
        transport.push_json(json!({"html": "<p>a</p>", "response_metadata": {"next_cursor": "c2"}}));
        transport.push_json(json!({"html": "<p>b</p>", "response_metadata": {"next_cursor": ""}}));
        let html = client.fetch_html("T").unwrap();
        assert_eq!(html.as_deref(), Some("<html><p>a</p><p>b</p></html>"));

        let requests = transport.requests();
        assert_eq!(requests[0].path(), "/2/threads/T/html");
        assert_eq!(requests[1].path(), "/2/threads/T/html?cursor=c2");
    }

    #[test]
    fn test_fetch_html_empty_is_none() {
        let (client, transport) = client();
        transport.push_json(json!({"html": "", "response_metadata": {"next_cursor": ""}}));
        assert_eq!(client.fetch_html("T").unwrap(), None);
    }

    #[test]
    fn test_get_thread() {
        let (client, transport) = client();
        transport.push_json(json!({"thread": {"id": "T", "title": "Doc", "type": "document"}}));
        let thread = client.get_thread("T").unwrap();
        assert_eq!(thread.title, "Doc");
        assert_eq!(transport.last_request().unwrap().path(), "/2/threads/T");

        transport.push_json(json!({}));
        assert!(matches!(
            client.get_thread("U"),
            Err(ClientError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_new_document_form() {
        let (client, transport) = client();
        transport.push_json(json!({"thread": {"id": "N"}, "html": "<p>x</p>"}));
        let members = vec!["U1".to_string(), "F2".to_string()];
        let response = client
            .new_document(&NewDocument {
                content: "<p>x</p>",
                format: "html",
                title: None,
                member_ids: &members,
                kind: ThreadKind::Spreadsheet,
            })
            .unwrap();
        assert_eq!(response.thread.unwrap().id, "N");

        let request = transport.last_request().unwrap();
        assert_eq!(request.path(), "/1/threads/new-document");
        let fields = FormFields::decode(request.body.as_deref().unwrap());
        assert_eq!(
            fields,
            vec![
                ("content".to_string(), "<p>x</p>".to_string()),
                ("format".to_string(), "html".to_string()),
                ("member_ids".to_string(), "U1,F2".to_string()),
                ("type".to_string(), "spreadsheet".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_query() {
        let (client, transport) = client();
        transport.push_json(json!([
            {"thread": {"id": "A", "title": "Alpha", "type": "document"}},
            {"thread": {"id": "B", "title": "Beta", "type": "spreadsheet"}}
        ]));
        let hits = client.search("al", Some(5), false).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].kind, ThreadKind::Spreadsheet);
        assert_eq!(
            transport.last_request().unwrap().path(),
            "/1/threads/search?query=al&count=5&only_match_titles=false"
        );
    }

    #[test]
    fn test_copy_and_delete() {
        let (client, transport) = client();
        transport.push_json(json!({"thread": {"id": "C", "title": "Doc (Copy)"}}));
        transport.push_json(json!({}));
        let folders = vec!["F1".to_string()];
        client
            .copy_document(&CopyDocument {
                thread_id: "T",
                title: "Doc (Copy)",
                folder_ids: &folders,
                member_ids: &[],
                copy_annotations: false,
            })
            .unwrap();
        let copy = transport.last_request().unwrap();
        assert_eq!(
            FormFields::decode(copy.body.as_deref().unwrap()),
            vec![
                ("thread_id".to_string(), "T".to_string()),
                ("folder_ids".to_string(), "F1".to_string()),
                ("title".to_string(), "Doc (Copy)".to_string()),
                ("copy_annotations".to_string(), "false".to_string()),
            ]
        );

        client.delete_thread("T").unwrap();
        assert_eq!(transport.last_request().unwrap().path(), "/1/threads/delete");
    }

    #[test]
    fn test_backoff_delay() {
        let config = ClientConfig::default();
        let client = RemoteClient::with_transport(config, MemoryTransport::new());
        assert_eq!(client.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(client.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(client.backoff_delay(3), Duration::from_secs(4));
    }
}
