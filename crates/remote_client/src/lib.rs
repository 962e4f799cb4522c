//! Remote Client - Access to the remote document service
//!
//! Provides:
//! - `ClientConfig`: token, base URL, timeout and retry policy
//! - `FormFields`: form/query encoding that omits empty values
//! - `Transport`: the request seam, with `HttpTransport` (reqwest) and the
//!   scripted `MemoryTransport`
//! - `RemoteClient`: URL building, bearer auth, timeout retry, error
//!   extraction and the typed thread API calls

mod client;
mod config;
mod error;
mod form;
mod http;
mod memory;
mod thread_meta;
mod transport;

pub use client::*;
pub use config::*;
pub use error::*;
pub use form::*;
pub use http::*;
pub use memory::*;
pub use thread_meta::*;
pub use transport::*;
