//! Core abstractions shared by contexts and pipes.
//!
//! - [`schema`]: catalog, schema and object references plus the resolver seam
//! - [`value`]: row values and batches
//! - [`traits`]: namespace dialects, table readers and writers
//! - [`identifier`]: identifier validation and quoting

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{CatalogRef, DatabaseObjectRef, SchemaCache, SchemaRef, SchemaResolver};
pub use traits::{NamespaceDialect, ReadOptions, TableReader, TableWriter};
pub use value::{Batch, SqlValue};
