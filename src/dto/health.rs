use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether a storage backend is currently connected.
    pub storage_connected: bool,
}

impl HealthResponse {
    /// Health response indicating the system is fully operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            storage_connected: true,
        }
    }

    /// Health response indicating the backend runs without storage.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            storage_connected: false,
        }
    }
}
