//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::ApiConfig;
use crate::db::DocumentStore;
use crate::services::token::TokenService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the optional document store and the token service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: Option<Arc<dyn DocumentStore>>,
    tokens: TokenService,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `store` - Document store, or `None` when no store is configured
    #[must_use]
    pub fn new(config: ApiConfig, store: Option<Arc<dyn DocumentStore>>) -> Self {
        let tokens = TokenService::new(&config.token);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                tokens,
                started_at: Utc::now(),
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the document store, if one is configured.
    #[must_use]
    pub fn store(&self) -> Option<&dyn DocumentStore> {
        self.inner.store.as_deref()
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// When this process started serving.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }
}
