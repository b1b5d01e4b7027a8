//! Shared application state for the web control surface.
//!
//! [`AppState`] is built once at process start and shared by every
//! request handler. The registry inside it lives as long as the process;
//! kettles created by one request stay reachable by later ones.

use std::sync::Arc;

use kettle_core::{KettleModel, KettleRegistry, Notifier};

use crate::error::ObserverError;
use crate::pages::Pages;

/// Shared state injected into every handler.
pub struct AppState {
    /// Live kettles keyed by identifier.
    pub registry: KettleRegistry,
    /// Static configuration every new kettle is built from.
    pub model: Arc<KettleModel>,
    /// Receives every notification of every kettle.
    pub notifier: Arc<dyn Notifier>,
    /// Compiled page templates.
    pub pages: Pages,
}

impl AppState {
    /// Create state with an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Template`] if the built-in page templates
    /// fail to compile.
    pub fn new(model: Arc<KettleModel>, notifier: Arc<dyn Notifier>) -> Result<Self, ObserverError> {
        Ok(Self {
            registry: KettleRegistry::new(),
            model,
            notifier,
            pages: Pages::new()?,
        })
    }
}
