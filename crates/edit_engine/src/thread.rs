//! A remote thread with its locally cached content

use crate::{EditRequest, Format, Result};
use address_resolver::{resolve_strict, LogicalAddress, Placement, ResolvedTarget};
use chrono::{DateTime, Utc};
use content_tree::{ContentCache, ContentTree};
use remote_client::{
    ClientError, CopyDocument, NewDocument, RemoteClient, ThreadKind, ThreadMeta, ThreadResponse,
};
use std::sync::Arc;

/// Parameters for creating a thread
#[derive(Debug, Clone, Default)]
pub struct NewThread {
    pub content: String,
    pub format: Option<Format>,
    pub title: Option<String>,
    pub member_ids: Vec<String>,
    pub kind: ThreadKind,
}

impl NewThread {
    pub fn document(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: ThreadKind::Document,
            ..Default::default()
        }
    }

    /// A spreadsheet; `content` should be a `<table>`
    pub fn spreadsheet(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format: Some(Format::Html),
            kind: ThreadKind::Spreadsheet,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_members(mut self, member_ids: Vec<String>) -> Self {
        self.member_ids = member_ids;
        self
    }
}

/// Where a copy goes and what it is called
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Defaults to `"{title} (Copy)"`
    pub title: Option<String>,
    pub folder_ids: Vec<String>,
    pub member_ids: Vec<String>,
    pub copy_annotations: bool,
}

/// A remote document or spreadsheet.
///
/// The raw snapshot is the source of truth; the content tree is derived from
/// it lazily and discarded whenever it changes. A snapshot that fails to parse
/// leaves the thread usable for identity fields while every tree read fails.
#[derive(Debug)]
pub struct Thread {
    client: Arc<RemoteClient>,
    meta: ThreadMeta,
    cache: ContentCache,
}

impl Thread {
    /// Fetch an existing thread and its content
    pub fn open(client: Arc<RemoteClient>, thread_id: &str) -> Result<Self> {
        let meta = client.get_thread(thread_id)?;
        let snapshot = client.fetch_html(&meta.id)?;
        tracing::info!("Opened thread {} ({:?})", meta.id, meta.kind);
        Ok(Self::from_parts(client, meta, snapshot))
    }

    /// Create a thread on the service
    pub fn create(client: Arc<RemoteClient>, new: &NewThread) -> Result<Self> {
        let format = new.format.unwrap_or(match new.kind {
            ThreadKind::Spreadsheet => Format::Html,
            _ => Format::Markdown,
        });
        let response = client.new_document(&NewDocument {
            content: &new.content,
            format: format.as_str(),
            title: new.title.as_deref(),
            member_ids: &new.member_ids,
            kind: new.kind,
        })?;
        let meta = response.thread.clone().ok_or_else(|| {
            ClientError::UnexpectedResponse("new-document returned no thread".to_string())
        })?;
        let snapshot = match response.markup() {
            Some(markup) => Some(markup.to_string()),
            None => client.fetch_html(&meta.id)?,
        };
        tracing::info!("Created thread {} titled {:?}", meta.id, meta.title);
        Ok(Self::from_parts(client, meta, snapshot))
    }

    /// Assemble a thread from already fetched parts
    pub fn from_parts(client: Arc<RemoteClient>, meta: ThreadMeta, snapshot: Option<String>) -> Self {
        Self {
            client,
            meta,
            cache: ContentCache::new(snapshot),
        }
    }

    pub fn client(&self) -> &Arc<RemoteClient> {
        &self.client
    }

    pub fn meta(&self) -> &ThreadMeta {
        &self.meta
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn kind(&self) -> ThreadKind {
        self.meta.kind
    }

    pub fn link(&self) -> &str {
        &self.meta.link
    }

    pub fn secret_path(&self) -> &str {
        &self.meta.secret_path
    }

    pub fn author_id(&self) -> &str {
        &self.meta.author_id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.meta.created_at()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.meta.updated_at()
    }

    /// Raw markup the tree is derived from
    pub fn snapshot(&self) -> Option<&str> {
        self.cache.snapshot()
    }

    /// The content tree, built on first access after a change
    pub fn tree(&self) -> Result<&ContentTree> {
        Ok(self.cache.tree()?)
    }

    pub fn is_corrupted(&self) -> bool {
        self.cache.is_corrupted()
    }

    /// Replace the snapshot with the service's current markup
    pub fn reload(&mut self) -> Result<()> {
        let snapshot = self.client.fetch_html(&self.meta.id)?;
        self.cache.replace(snapshot);
        tracing::info!("Reloaded thread {}", self.meta.id);
        Ok(())
    }

    /// Replace the snapshot with known markup
    pub fn reload_with(&mut self, markup: impl Into<String>) {
        self.cache.replace(Some(markup.into()));
    }

    /// Send one edit and refresh the local snapshot.
    ///
    /// On success the snapshot becomes the markup returned with the edit, or a
    /// fresh fetch when none came back. If the edit or that fetch fails,
    /// neither the snapshot nor the identity fields change. A
    /// delete refused with HTTP 400 is retried once as a blank replace.
    pub fn apply(&mut self, request: &EditRequest) -> Result<ThreadResponse> {
        let form = request.to_form(&self.meta.id);
        tracing::info!(
            "Editing thread {} at location {} ({:?})",
            self.meta.id,
            request.location(),
            request.target
        );

        let response = match self.client.edit_document(&form) {
            Ok(response) => response,
            Err(e) if request.placement == Placement::Delete && e.status() == Some(400) => {
                tracing::warn!("Delete refused ({}), replacing with blank content instead", e);
                let fallback = request.replace_fallback();
                self.client.edit_document(&fallback.to_form(&self.meta.id))?
            }
            Err(e) => return Err(e.into()),
        };

        // Meta and snapshot are committed together once both are known
        let snapshot = match response.markup() {
            Some(markup) => Some(markup.to_string()),
            None => self.client.fetch_html(&self.meta.id)?,
        };
        if let Some(meta) = response.thread.as_ref().filter(|meta| meta.id == self.meta.id) {
            self.meta = meta.clone();
        }
        self.cache.replace(snapshot);
        Ok(response)
    }

    /// Edit from a placement and an optional anchor
    pub fn apply_at(
        &mut self,
        content: &str,
        placement: Placement,
        anchor: Option<&str>,
        format: Format,
    ) -> Result<ThreadResponse> {
        let request = EditRequest::positional(content, placement, anchor, format)?;
        self.apply(&request)
    }

    /// Resolve a logical address against the current content
    pub fn resolve(&self, address: &LogicalAddress) -> Result<ResolvedTarget> {
        match address {
            LogicalAddress::Document(edge) => Ok(ResolvedTarget::document(*edge)),
            _ => Ok(resolve_strict(self.tree()?, address)?),
        }
    }

    /// Resolve `address` and edit there
    pub fn edit(&mut self, content: &str, address: &LogicalAddress, format: Format) -> Result<ThreadResponse> {
        let resolved = self.resolve(address)?;
        let request = EditRequest::new(content, resolved, format)?;
        self.apply(&request)
    }

    /// Copy this thread and open the copy
    pub fn copy(&self, options: &CopyOptions) -> Result<Thread> {
        let title = options
            .title
            .clone()
            .unwrap_or_else(|| format!("{} (Copy)", self.meta.title));
        let response = self.client.copy_document(&CopyDocument {
            thread_id: &self.meta.id,
            title: &title,
            folder_ids: &options.folder_ids,
            member_ids: &options.member_ids,
            copy_annotations: options.copy_annotations,
        })?;
        let copy = response.thread.ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("copy of {} returned no thread", self.meta.id))
        })?;
        Thread::open(self.client.clone(), &copy.id)
    }

    /// Delete this thread on the service
    pub fn delete(self) -> Result<()> {
        self.client.delete_thread(&self.meta.id)?;
        tracing::info!("Deleted thread {}", self.meta.id);
        Ok(())
    }
}
