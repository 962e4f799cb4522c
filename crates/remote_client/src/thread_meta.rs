//! Thread metadata as reported by the service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadKind {
    #[default]
    Document,
    Spreadsheet,
    /// Chats, slides and anything else
    #[serde(other)]
    Other,
}

impl ThreadKind {
    /// Value of the `type` form field when creating a thread
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadKind::Document => "document",
            ThreadKind::Spreadsheet => "spreadsheet",
            ThreadKind::Other => "other",
        }
    }
}

/// Identity fields of a thread
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadMeta {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ThreadKind,
    pub link: String,
    pub secret_path: String,
    pub author_id: String,
    /// Microseconds since the epoch
    pub created_usec: i64,
    /// Microseconds since the epoch
    pub updated_usec: i64,
}

impl ThreadMeta {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.created_usec)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.updated_usec)
    }
}

/// Response shape of thread-returning calls: `{thread, html?}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadResponse {
    pub thread: Option<ThreadMeta>,
    pub html: Option<String>,
}

impl ThreadResponse {
    /// Returned markup, when present and non-empty
    pub fn markup(&self) -> Option<&str> {
        self.html.as_deref().filter(|html| !html.is_empty())
    }
}
