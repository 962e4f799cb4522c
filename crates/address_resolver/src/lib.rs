//! Address Resolver - Logical addresses to anchor identifiers
//!
//! Every function in this crate is a pure read of a `ContentTree`: addresses
//! are resolved against the current tree on each call and never cached.
//!
//! # Example
//!
//! ```rust
//! use address_resolver::{resolve, ListPosition, LogicalAddress, Relation};
//! use content_tree::ContentTree;
//!
//! let tree = ContentTree::parse(
//!     r#"<ul id="todo"><li id="a">one</li><li id="b">two</li></ul>"#,
//! ).unwrap();
//!
//! let address = LogicalAddress::list_item("todo", ListPosition::Last, Relation::After);
//! let target = resolve(&tree, &address).unwrap();
//! assert_eq!(target.anchor_id().unwrap().as_str(), "b");
//! ```

mod address;
mod column;
mod error;
mod list;
mod placement;
mod table;

pub use address::*;
pub use column::*;
pub use error::*;
pub use list::*;
pub use placement::*;
pub use table::*;
