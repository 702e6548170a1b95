use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::flood_reports::handlers::{list_reports, submit_report};
use crate::features::flood_reports::services::IngestionService;

/// Create routes for the flood reports feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<IngestionService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/api/report",
            post(submit_report).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/api/reports", get(list_reports))
        .with_state(service)
}
