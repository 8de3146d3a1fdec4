pub mod debounce;
pub mod lifecycle;

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{RwLock, watch};

use crate::{
    clock::Clock, config::AppConfig, dao::tipping_store::TippingStore, error::ServiceError,
};

use self::debounce::ReadDebounce;

pub type SharedState = Arc<AppState>;

/// Central application state: the storage handle, the clock and immutable configuration.
pub struct AppState {
    tipping_store: RwLock<Option<Arc<dyn TippingStore>>>,
    degraded: watch::Sender<bool>,
    clock: Arc<dyn Clock>,
    config: AppConfig,
    read_debounce: ReadDebounce,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            tipping_store: RwLock::new(None),
            degraded: degraded_tx,
            clock,
            read_debounce: ReadDebounce::new(config.read_debounce),
            config,
        })
    }

    /// Construct a state with `store` already installed.
    pub async fn with_store(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        store: Arc<dyn TippingStore>,
    ) -> SharedState {
        let state = Self::new(config, clock);
        state.set_tipping_store(store).await;
        state
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn tipping_store(&self) -> Option<Arc<dyn TippingStore>> {
        let guard = self.tipping_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with [`ServiceError::Degraded`].
    pub async fn require_tipping_store(&self) -> Result<Arc<dyn TippingStore>, ServiceError> {
        self.tipping_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn set_tipping_store(&self, store: Arc<dyn TippingStore>) {
        {
            let mut guard = self.tipping_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_tipping_store(&self) {
        {
            let mut guard = self.tipping_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Gate spacing out reconciliation passes triggered by reads.
    pub fn read_debounce(&self) -> &ReadDebounce {
        &self.read_debounce
    }
}
