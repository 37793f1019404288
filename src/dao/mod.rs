//! Persistence layer: entities, the backend-agnostic store contract, and the
//! CouchDB implementation.

/// Document storage contract and backends.
pub mod document_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
