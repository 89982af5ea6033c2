//! Rutas HTTP de la API
//!
//! Cada recurso expone su propio `Router<AppState>`; aquí se anidan bajo
//! `/api` y se aplican las capas comunes.

pub mod apprentice_routes;
pub mod assignment_routes;
pub mod company_routes;
pub mod placement_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/apprentices", apprentice_routes::create_apprentice_router())
        .nest("/api/companies", company_routes::create_company_router())
        .nest("/api/assignments", assignment_routes::create_assignment_router())
        .nest("/api/placements", placement_routes::create_placement_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET /health - Health check del servicio
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "practicas-backend",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
