//! Health endpoint

use std::sync::Arc;

use rocket::serde::json::Json;
use rocket::{State, get};

use vb_infrastructure::EngineContext;

use crate::models::HealthResponse;

/// Liveness plus a summary of the active routing pool
#[get("/health")]
pub fn health(engine: &State<Arc<EngineContext>>) -> Json<HealthResponse> {
    let snapshot = engine.router().current_snapshot();
    Json(HealthResponse {
        status: "healthy",
        snapshot_version: snapshot.version,
        embedding_providers: snapshot
            .endpoints()
            .iter()
            .map(|e| e.name.clone())
            .collect(),
    })
}
