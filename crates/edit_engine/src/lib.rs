//! Edit Engine - Documents and spreadsheets edited through the remote service
//!
//! A `Thread` owns a markup snapshot and the content tree derived from it.
//! Every edit resolves a logical address against that tree, is sent as one
//! positional request, and replaces the snapshot with the service's answer.
//! `Document` and `Spreadsheet` layer list, section and row/cell operations on
//! top; `AnyThread` picks the right one from the thread's kind.

mod any_thread;
mod document;
mod error;
mod request;
mod spreadsheet;
mod thread;

pub use any_thread::*;
pub use document::*;
pub use error::*;
pub use request::*;
pub use spreadsheet::*;
pub use thread::*;
