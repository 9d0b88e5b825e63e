/**
 * API REST FAIRGO - Serveur HTTP du kernel
 *
 * RÔLE :
 * Expose le snapshot live normalisé pour le dashboard et tout autre consommateur.
 *
 * ROUTES :
 * - GET /api/live       -> 200 Snapshot | 500 { error, details }
 * - GET /health         -> "ok"
 * - GET /system/health  -> état du kernel et de l'upstream
 *
 * Les noms de champs JSON de /api/live sont un contrat de compatibilité.
 */

use crate::health::KernelHealth;
use crate::snapshot::SnapshotService;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub snapshots: Arc<SnapshotService>,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/api/live", get(get_live))
        .with_state(app_state)
}

// GET /api/live
async fn get_live(State(app): State<AppState>) -> Response {
    let no_store = [(header::CACHE_CONTROL, "no-store")];
    match app.snapshots.get_snapshot().await {
        Ok(snapshot) => (StatusCode::OK, no_store, Json(snapshot)).into_response(),
        Err(failure) => (StatusCode::INTERNAL_SERVER_ERROR, no_store, Json(failure)).into_response(),
    }
}

// GET /system/health
async fn get_system_health(State(app): State<AppState>) -> Json<KernelHealth> {
    Json(app.snapshots.health().get_health())
}
