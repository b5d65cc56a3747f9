//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::Settings;
use crate::error::AppError;
use crate::render::RenderClient;
use crate::store::ModelStore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// In-memory conceptual model store (has internal locking)
    pub model: ModelStore,

    /// Client for the external diagram rendering service
    pub renderer: RenderClient,
}

impl AppState {
    /// Create new application state from settings
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        Ok(Self {
            model: ModelStore::new(),
            renderer: RenderClient::new(&settings.renderer)?,
        })
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
