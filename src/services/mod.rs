//! Business logic shared between the REST and WebSocket surfaces.

/// Token issuing, login and account creation.
pub mod auth_service;
/// Conference slot bookings.
pub mod booking_service;
/// Counter mutations and celebration events.
pub mod counter_service;
/// OpenAPI document assembly.
pub mod documentation;
/// Storage-backed liveness reporting.
pub mod health_service;
/// Leaderboard aggregation and ranking.
pub mod leaderboard_service;
/// Leave requests and their approval chain.
pub mod leave_service;
/// Takeover notification lifecycle.
pub mod notification_service;
/// Midnight counter rollovers and monthly archiving.
pub mod rollover_service;
/// Storage connection supervision.
pub mod storage_supervisor;
/// Team, agent and settings management.
pub mod team_service;
/// WebSocket connection handling.
pub mod websocket_service;
/// Typed broadcast helpers.
pub mod ws_events;
