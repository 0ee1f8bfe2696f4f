//! # Route Table
//!
//! The whitelisted endpoint surface. Every product route checks the
//! permission gate before touching the catalog; `/healthz` is the only
//! unauthenticated route.
//!
//! ```text
//! GET /healthz                          liveness + database ping
//! GET /api/products                     paged listing
//! GET /api/products/search              bulk union search (name + code)
//! GET /api/products/resolve             multi-stage point resolution
//! GET /api/products/by-code/{code}      exact code, partial fallback
//! GET /api/products/by-barcode/{code}   barcode index, code fallback
//! GET /api/products/{id}                product detail
//! GET /api/permissions                  caller's permission echo
//! GET /api/debug/resolution             traced resolution walk
//! GET /api/debug/images                 image reference diagnosis
//! ```

pub mod debug;
pub mod products;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/products", get(products::list))
        .route("/api/products/search", get(products::search))
        .route("/api/products/resolve", get(products::resolve))
        .route("/api/products/by-code/{code}", get(products::by_code))
        .route("/api/products/by-barcode/{barcode}", get(products::by_barcode))
        .route("/api/products/{id}", get(products::detail))
        .route("/api/permissions", get(products::permissions))
        .route("/api/debug/resolution", get(debug::resolution))
        .route("/api/debug/images", get(debug::images))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: reports whether the database answers a ping.
async fn healthz(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database_up = state.db.health_check().await;
    Json(json!({
        "status": if database_up { "ok" } else { "degraded" },
        "database": if database_up { "up" } else { "down" },
    }))
}
