//! Content Tree - Parsed, navigable representation of a thread's markup
//!
//! This crate turns the HTML rendered by the remote service into an
//! arena-backed tree whose elements carry the service's anchor identifiers
//! (`id` attributes). The tree is a read cache: it is rebuilt in full from the
//! raw snapshot whenever the snapshot changes, never patched in place.

mod anchor;
mod cache;
mod error;
mod node;
mod parser;
mod tree;

pub use anchor::*;
pub use cache::*;
pub use error::*;
pub use node::*;
pub use parser::*;
pub use tree::*;
