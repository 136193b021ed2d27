//! Application state shared across handlers.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use blife_core::MillisClock;
use blife_core::commission::CommissionLedger;

use crate::config::StorefrontConfig;
use crate::repository::Repository;
use crate::storage::{FileKv, KeyValueStore, MemoryKv, StorageError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the marketplace repository and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    repository: Repository,
    commissions: Mutex<CommissionLedger>,
    login_clock: MillisClock,
}

impl AppState {
    /// Create application state over an existing key-value store.
    #[must_use]
    pub fn new(config: StorefrontConfig, kv: Arc<dyn KeyValueStore>) -> Self {
        let repository = Repository::for_data_source(config.data_source, kv);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                repository,
                commissions: Mutex::new(CommissionLedger::sample(Utc::now())),
                login_clock: MillisClock::new(),
            }),
        }
    }

    /// Create application state, opening the store named by the config.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if `data_dir` is set and cannot be created.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StorageError> {
        let kv: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => Arc::new(FileKv::open(dir)?),
            None => Arc::new(MemoryKv::new()),
        };
        Ok(Self::new(config, kv))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace repository.
    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.inner.repository
    }

    /// The process-local commission ledger.
    #[must_use]
    pub fn commissions(&self) -> &Mutex<CommissionLedger> {
        &self.inner.commissions
    }

    /// Strictly increasing millisecond stamp for mock login IDs.
    #[must_use]
    pub fn next_login_millis(&self) -> i64 {
        self.inner.login_clock.next()
    }
}
