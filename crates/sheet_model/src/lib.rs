//! Sheet Model - Tabular view of spreadsheet tables
//!
//! Derives headers, rows and cells from a table in a content tree, builds
//! row markup for insertion (reconciling partial header-keyed updates against
//! the header layout), and exports sheets as JSON-ready maps or `.xlsx` files.

mod cell_ref;
mod error;
mod export;
mod model;
mod row_builder;
mod value;

pub use cell_ref::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use row_builder::*;
pub use value::*;
