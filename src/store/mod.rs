//! Document store client: named collections of JSON documents keyed by `_id`.

mod config;
mod error;
pub mod sqlite;
pub mod traits;

pub use config::{Location, StoreConfig};
pub use error::StoreError;
pub use sqlite::SqliteDocumentStore;
pub use traits::{document_id, DocumentStore};
