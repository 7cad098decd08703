use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, with_security_headers, Config};
use crate::handlers::{events, health};
use crate::repository::{EventRepository, StoreProbe};

/// All endpoints, without middleware.
pub fn create_routes(events: Arc<dyn EventRepository>, probe: Arc<dyn StoreProbe>) -> Router {
    Router::new()
        .merge(health::router(probe))
        .nest("/api/v1", events::router(events))
}

/// Wraps the routes with request tracing, CORS and security headers.
pub fn create_app(routes: Router, config: &Config) -> Router {
    with_security_headers(routes, config.production).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(config.cors_allowed_origins.as_deref())),
    )
}
