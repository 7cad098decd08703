use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use crate::repository::StoreProbe;
use crate::utils::error::AppError;
use crate::utils::response::message;

pub fn router(probe: Arc<dyn StoreProbe>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .with_state(probe)
}

/// GET /healthz
pub async fn health_check(
    State(probe): State<Arc<dyn StoreProbe>>,
) -> Result<Response, AppError> {
    probe.ping().await?;
    Ok(message(StatusCode::OK, "healthy"))
}
