//! CouchDB-backed [`DocumentStore`](super::DocumentStore) implementation.

/// Connection settings.
pub mod config;
/// Error types shared by the CouchDB storage implementation.
pub mod error;
/// Document shapes and `_id` conventions.
pub mod models;
/// The store itself.
pub mod store;

pub use config::CouchConfig;
pub use error::{CouchDaoError, CouchResult};
pub use store::CouchDocumentStore;

use crate::dao::storage::StorageError;

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        match err {
            CouchDaoError::DocumentExists { doc_id } => StorageError::Conflict { id: doc_id },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
