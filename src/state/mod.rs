//! Shared application state: the installed storage backend, the degraded
//! flag, the catalog client, and the per-playlist ingestion locks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};

use crate::{catalog::CatalogClient, dao::document_store::DocumentStore, error::ServiceError};

/// Cheaply clonable handle on the application state.
pub type SharedState = Arc<AppState>;

/// Central application state shared by every request handler.
///
/// Requests themselves are stateless; everything here is either a connection
/// handle or a synchronization primitive.
pub struct AppState {
    store: RwLock<Option<Arc<dyn DocumentStore>>>,
    degraded: watch::Sender<bool>,
    ingest_locks: DashMap<String, Arc<Mutex<()>>>,
    catalog: CatalogClient,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is
    /// installed by the supervisor.
    pub fn new(catalog: CatalogClient) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
            ingest_locks: DashMap::new(),
            catalog,
        })
    }

    /// Obtain a handle to the current document store, if one is installed.
    pub async fn document_store(&self) -> Option<Arc<dyn DocumentStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the document store or fail with the degraded-mode error.
    pub async fn require_store(&self) -> Result<Arc<dyn DocumentStore>, ServiceError> {
        self.document_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a storage backend and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn DocumentStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Drop the storage backend and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Client for the external music catalog.
    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// Lock serializing ingestion per playlist id, so two concurrent ingests
    /// of the same playlist cannot both take the create path.
    pub fn ingest_guard(&self, playlist_id: &str) -> Arc<Mutex<()>> {
        self.ingest_locks
            .entry(playlist_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
