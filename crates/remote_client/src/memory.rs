//! Scripted in-memory transport
//!
//! Replays queued responses in order and records every request it sees.
//! Shared through `Arc`, so a test can keep a handle while the client owns
//! another.

use crate::{HttpRequest, HttpResponse, Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory implementation of `Transport`
#[derive(Debug, Default)]
pub struct MemoryTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        lock(&self.responses).push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a 200 response carrying `value`
    pub fn push_json(&self, value: serde_json::Value) {
        self.push_response(200, value.to_string());
    }

    /// Queue an error response carrying an `error_description`
    pub fn push_error(&self, status: u16, description: &str) {
        let body = serde_json::json!({ "error_code": status, "error_description": description });
        self.push_response(status, body.to_string());
    }

    /// Queue a timeout
    pub fn push_timeout(&self) {
        lock(&self.responses).push_back(Err(TransportError::Timeout("scripted timeout".into())));
    }

    /// Every request executed so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Responses still queued
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }
}

impl Transport for MemoryTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io(format!("no scripted response for {}", request.url))))
    }
}
