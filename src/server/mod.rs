//! Embedded HTTP server: routing, shared context, lifecycle.

use axum::http::{header, Method};
use axum::Router;
use axum_embed::{FallbackBehavior, ServeEmbed};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::{CatalogStore, MediaSource};

pub mod error;
pub mod lifecycle;
pub mod routes_music;

pub use lifecycle::{MediaServer, ServerState};

/// Bundled web player page, served for `/` and any unknown path.
#[derive(RustEmbed, Clone)]
#[folder = "webui/"]
struct WebAssets;

/// Shared application context handed to every request handler.
///
/// Owning the catalog and source here (instead of process-wide singletons)
/// is what makes clean start/stop/restart cycles and in-process tests
/// possible.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<CatalogStore>,
    pub source: Arc<dyn MediaSource>,
}

impl AppContext {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        Self {
            catalog: Arc::new(CatalogStore::new()),
            source,
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    // Browser clients issue cross-origin range requests; Range must be
    // allowed in and Content-Range exposed back out.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::RANGE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::ACCEPT_RANGES,
            header::CONTENT_LENGTH,
        ]);

    let assets = ServeEmbed::<WebAssets>::with_parameters(
        Some("index.html".to_string()),
        FallbackBehavior::Ok,
        Some("index.html".to_string()),
    );

    Router::new()
        .nest("/music", routes_music::music_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
        .fallback_service(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture::FixtureSource;

    #[test]
    fn test_router_creation() {
        let ctx = AppContext::new(Arc::new(FixtureSource::new()));
        let _router = create_router(ctx);
    }
}
