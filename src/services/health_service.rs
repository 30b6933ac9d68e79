//! Liveness reporting backed by the storage health check.

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Current service health: `ok` when the store answers its ping, `degraded`
/// otherwise.
pub async fn current(state: &SharedState) -> HealthResponse {
    if state.is_degraded() {
        return HealthResponse::degraded();
    }
    let Some(store) = state.sales_store().await else {
        return HealthResponse::degraded();
    };

    match store.health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig, dao::sales_store::memory::MemorySalesStore, state::AppState,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn reports_degraded_without_a_store_and_ok_with_one() {
        let state = AppState::new(AppConfig::default());
        assert!(!current(&state).await.storage_connected);

        state
            .install_sales_store(Arc::new(MemorySalesStore::new()))
            .await;
        assert!(current(&state).await.storage_connected);

        state.clear_sales_store().await;
        assert!(!current(&state).await.storage_connected);
    }
}
