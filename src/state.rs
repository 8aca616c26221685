//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Store;
use crate::utils::Clock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Storage collaborator
    store: Arc<dyn Store>,

    /// Source of the current time
    clock: Arc<dyn Clock>,

    /// Held for the duration of one expiry sweep
    sweep_guard: Arc<Mutex<()>>,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                clock,
                sweep_guard: Arc::new(Mutex::new(())),
                config,
            }),
        }
    }

    /// Get a reference to the store
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Current time according to the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// Guard serializing expiry sweeps
    pub fn sweep_guard(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.inner.sweep_guard)
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
