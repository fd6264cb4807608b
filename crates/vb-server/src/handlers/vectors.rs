//! Vector store and search endpoints

use std::sync::Arc;
use std::time::Instant;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, post};
use tracing::warn;
use validator::Validate;

use vb_domain::value_objects::{RoutePreference, SourceRecord, VectorType};
use vb_infrastructure::EngineContext;

use crate::guards::Tenant;
use crate::models::{
    SearchVectorsRequest, SearchVectorsResponse, StoreVectorRequest, StoreVectorResponse,
};

/// Default match limit when the request omits one
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Store one record's vector synchronously
///
/// Validation failures answer 400; processing failures answer 200 with a
/// `success:false` envelope so callers can skip vectorization gracefully.
#[post("/vectors/store", format = "json", data = "<request>")]
pub async fn store_vector(
    tenant: Tenant,
    engine: &State<Arc<EngineContext>>,
    request: Json<StoreVectorRequest>,
) -> (Status, Json<StoreVectorResponse>) {
    let started = Instant::now();
    let request = request.into_inner();

    if let Err(e) = request.validate() {
        return (
            Status::BadRequest,
            Json(StoreVectorResponse::failure(
                format!("invalid request: {e}"),
                elapsed_ms(started),
            )),
        );
    }
    let vector_type = match request.vector_type.parse::<VectorType>() {
        Ok(vt) => vt,
        Err(e) => {
            return (
                Status::BadRequest,
                Json(StoreVectorResponse::failure(
                    e.to_string(),
                    elapsed_ms(started),
                )),
            );
        }
    };
    let preference = match parse_preference(request.preference.as_deref()) {
        Ok(p) => p,
        Err(message) => {
            return (
                Status::BadRequest,
                Json(StoreVectorResponse::failure(message, elapsed_ms(started))),
            );
        }
    };

    let record = SourceRecord::new(request.record_id, request.content);
    match engine
        .pipeline()
        .store_record(tenant.0, &request.table_name, record, vector_type, preference)
        .await
    {
        Ok(stored) => (
            Status::Ok,
            Json(StoreVectorResponse {
                success: true,
                point_id: Some(stored.point_id),
                provider_used: Some(stored.provider),
                processing_time_ms: elapsed_ms(started),
                cost: stored.cost,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(tenant_id = tenant.0, error = %e, "vector store request failed");
            (
                Status::Ok,
                Json(StoreVectorResponse::failure(
                    e.to_string(),
                    elapsed_ms(started),
                )),
            )
        }
    }
}

/// Semantic search over a table's collection
#[post("/vectors/search", format = "json", data = "<request>")]
pub async fn search_vectors(
    tenant: Tenant,
    engine: &State<Arc<EngineContext>>,
    request: Json<SearchVectorsRequest>,
) -> (Status, Json<SearchVectorsResponse>) {
    let started = Instant::now();
    let request = request.into_inner();

    if let Err(e) = request.validate() {
        return (
            Status::BadRequest,
            Json(SearchVectorsResponse::failure(
                format!("invalid request: {e}"),
                elapsed_ms(started),
            )),
        );
    }
    let preference = match parse_preference(request.preference.as_deref()) {
        Ok(p) => p,
        Err(message) => {
            return (
                Status::BadRequest,
                Json(SearchVectorsResponse::failure(message, elapsed_ms(started))),
            );
        }
    };
    let limit = request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    match engine
        .queries()
        .search(
            tenant.0,
            &request.table_name,
            &request.query_text,
            limit,
            preference,
        )
        .await
    {
        Ok(outcome) => (
            Status::Ok,
            Json(SearchVectorsResponse {
                success: true,
                results: outcome.matches,
                provider_used: Some(outcome.provider_used),
                processing_time_ms: outcome.processing_time_ms,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(tenant_id = tenant.0, error = %e, "vector search request failed");
            (
                Status::Ok,
                Json(SearchVectorsResponse::failure(
                    e.to_string(),
                    elapsed_ms(started),
                )),
            )
        }
    }
}

fn parse_preference(raw: Option<&str>) -> Result<Option<RoutePreference>, String> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .parse::<RoutePreference>()
            .map(Some)
            .map_err(|e| e.to_string()),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
