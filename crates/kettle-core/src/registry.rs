//! Concurrency-safe map of live kettles.
//!
//! The web surface creates kettles in one request and drives them in later
//! ones. Entries are never evicted; the registry lives as long as the
//! process.

use std::collections::BTreeMap;
use std::sync::Arc;

use kettle_types::KettleId;
use tokio::sync::RwLock;
use tracing::debug;

use crate::kettle::Kettle;

/// Errors returned by [`KettleRegistry`] lookups and inserts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No kettle is registered under the identifier.
    #[error("kettle not found: {id}")]
    NotFound {
        /// The identifier that was looked up.
        id: KettleId,
    },

    /// A kettle with the same identifier is already registered.
    #[error("kettle already registered: {id}")]
    Duplicate {
        /// The conflicting identifier.
        id: KettleId,
    },
}

/// Shared registry of kettles keyed by identifier.
#[derive(Debug, Default)]
pub struct KettleRegistry {
    kettles: RwLock<BTreeMap<KettleId, Arc<Kettle>>>,
}

impl KettleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kettle and return the shared handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the identifier is taken. The
    /// existing entry is left untouched.
    pub async fn put(&self, kettle: Kettle) -> Result<Arc<Kettle>, RegistryError> {
        let id = kettle.id();
        let mut kettles = self.kettles.write().await;
        if kettles.contains_key(&id) {
            return Err(RegistryError::Duplicate { id });
        }
        let kettle = Arc::new(kettle);
        kettles.insert(id, Arc::clone(&kettle));
        debug!(kettle_id = %id, total = kettles.len(), "Kettle registered");
        Ok(kettle)
    }

    /// Look up a kettle by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if nothing is registered under
    /// `id`.
    pub async fn get(&self, id: KettleId) -> Result<Arc<Kettle>, RegistryError> {
        self.kettles
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound { id })
    }

    /// Number of registered kettles.
    pub async fn len(&self) -> usize {
        self.kettles.read().await.len()
    }

    /// Return `true` if no kettle is registered.
    pub async fn is_empty(&self) -> bool {
        self.kettles.read().await.is_empty()
    }

    /// Identifiers of every registered kettle, in ascending order.
    pub async fn ids(&self) -> Vec<KettleId> {
        self.kettles.read().await.keys().copied().collect()
    }
}
