pub mod hub;
pub mod rate_limit;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

use crate::{config::AppConfig, dao::sales_store::SalesStore, error::ServiceError};

pub use self::hub::{ConnectionHub, OUTBOUND_QUEUE_CAPACITY};
pub use self::rate_limit::RateLimiter;

pub type SharedState = Arc<AppState>;

/// Central application state: storage handle, connection hub, rate limiter
/// and the cross-task timer slots.
pub struct AppState {
    sales_store: RwLock<Option<Arc<dyn SalesStore>>>,
    hub: ConnectionHub,
    rate_limiter: RateLimiter,
    degraded: watch::Sender<bool>,
    notification_timer: Mutex<Option<JoinHandle<()>>>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            sales_store: RwLock::new(None),
            hub: ConnectionHub::new(),
            rate_limiter: RateLimiter::default(),
            degraded: degraded_tx,
            notification_timer: Mutex::new(None),
            config,
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn sales_store(&self) -> Option<Arc<dyn SalesStore>> {
        let guard = self.sales_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with [`ServiceError::Degraded`].
    pub async fn require_sales_store(&self) -> Result<Arc<dyn SalesStore>, ServiceError> {
        self.sales_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn install_sales_store(&self, store: Arc<dyn SalesStore>) {
        {
            let mut guard = self.sales_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_sales_store(&self) {
        {
            let mut guard = self.sales_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag. Also set while a still-installed store is
    /// failing its health checks.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Fan-out hub for connected WebSocket clients.
    pub fn hub(&self) -> &ConnectionHub {
        &self.hub
    }

    /// Per-actor mutation budget.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replace the pending notification auto-expiry task, aborting the
    /// previous one so a superseded notification cannot clear its successor.
    pub async fn replace_notification_timer(&self, handle: JoinHandle<()>) {
        let mut guard = self.notification_timer.lock().await;
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the pending auto-expiry task, if any.
    pub async fn cancel_notification_timer(&self) {
        let mut guard = self.notification_timer.lock().await;
        if let Some(previous) = guard.take() {
            previous.abort();
        }
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub(crate) fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}
