//! Performance metrics endpoint

use std::sync::Arc;

use rocket::serde::json::Json;
use rocket::{State, get};

use vb_infrastructure::EngineContext;

use crate::models::MetricsResponse;

/// Current cache hit rates, provider usage, latency, and error counts
#[get("/performance/metrics")]
pub fn performance_metrics(engine: &State<Arc<EngineContext>>) -> Json<MetricsResponse> {
    use vb_domain::ports::infrastructure::MetricsSink;

    Json(MetricsResponse {
        success: true,
        metrics: engine.metrics().snapshot(),
    })
}
