use std::sync::Arc;

use vitrine_pipeline::PostPublisher;
use vitrine_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vitrine_db::DbPool,
    /// Server configuration (CORS, timeouts, contact handles).
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing studio events.
    pub event_bus: Arc<vitrine_events::EventBus>,
    /// Object storage for uploaded decorative assets.
    pub storage: Arc<dyn ObjectStorage>,
    /// The end-to-end publish flow (render, upload, platform publish).
    pub publisher: Arc<PostPublisher>,
}
