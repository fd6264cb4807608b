//! Configuration surface
//!
//! Consumed by the out-of-scope admin UI: the provider pool and per-tenant
//! preferences, hot-reloadable with no restart. Updates go through the
//! config watcher, which validates, persists, and swaps atomically; the
//! engine's reload listener rebuilds the routing snapshot.

use std::sync::Arc;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, get, put};
use validator::Validate;

use vb_infrastructure::EngineContext;
use vb_infrastructure::config::EmbeddingEndpointSettings;

use crate::models::{
    AckResponse, ProviderEndpointDto, ProvidersConfigResponse, TenantPreferenceRequest,
    UpdateProvidersRequest,
};

/// Current provider pool, with secrets removed
#[get("/config/providers")]
pub fn get_providers(engine: &State<Arc<EngineContext>>) -> Json<ProvidersConfigResponse> {
    let config = engine.config().get_config();
    Json(ProvidersConfigResponse {
        success: true,
        embedding: config
            .providers
            .embedding
            .iter()
            .map(|e| ProviderEndpointDto {
                provider: e.provider.clone(),
                model: e.model.clone(),
                api_key: None,
                base_url: e.base_url.clone(),
                cost_per_call: e.cost_per_call,
                priority: e.priority,
                hosted: e.hosted,
                active: e.active,
            })
            .collect(),
        vector_store: config.providers.vector_store.provider.clone(),
        ledger: config.providers.ledger.provider.clone(),
    })
}

/// Replace the embedding endpoint pool
///
/// The swap is atomic: requests in flight finish on the old snapshot, new
/// requests route on the new one. Endpoints omitting an API key keep the
/// key already configured for that provider.
#[put("/config/providers", format = "json", data = "<request>")]
pub fn update_providers(
    engine: &State<Arc<EngineContext>>,
    request: Json<UpdateProvidersRequest>,
) -> (Status, Json<AckResponse>) {
    let request = request.into_inner();
    if let Err(e) = request.validate() {
        return (
            Status::BadRequest,
            Json(AckResponse::failure(format!("invalid request: {e}"))),
        );
    }

    let current = engine.config().get_config();
    let mut config = (*current).clone();
    config.providers.embedding = request
        .embedding
        .into_iter()
        .map(|dto| {
            let api_key = dto.api_key.or_else(|| {
                current
                    .providers
                    .embedding
                    .iter()
                    .find(|e| e.provider == dto.provider)
                    .and_then(|e| e.api_key.clone())
            });
            EmbeddingEndpointSettings {
                provider: dto.provider,
                model: dto.model,
                api_key,
                base_url: dto.base_url,
                dimensions: None,
                cost_per_call: dto.cost_per_call,
                priority: dto.priority,
                hosted: dto.hosted,
                active: dto.active,
            }
        })
        .collect();

    // Prove the pool resolves before accepting it; a name the registry
    // does not know must not reach the persisted configuration
    if let Err(e) = vb_infrastructure::bootstrap::build_routing_snapshot(&config, 0) {
        return (
            Status::UnprocessableEntity,
            Json(AckResponse::failure(e.to_string())),
        );
    }

    match engine.config().update(config) {
        Ok(_) => (Status::Ok, Json(AckResponse::ok())),
        Err(e) => (
            Status::UnprocessableEntity,
            Json(AckResponse::failure(e.to_string())),
        ),
    }
}

/// Set one tenant's routing preference
#[put("/config/tenants/<tenant_id>/preference", format = "json", data = "<request>")]
pub fn update_tenant_preference(
    engine: &State<Arc<EngineContext>>,
    tenant_id: u64,
    request: Json<TenantPreferenceRequest>,
) -> (Status, Json<AckResponse>) {
    let request = request.into_inner();
    if let Err(e) = request.validate() {
        return (
            Status::BadRequest,
            Json(AckResponse::failure(format!("invalid request: {e}"))),
        );
    }

    let mut config = (*engine.config().get_config()).clone();
    config
        .routing
        .tenant_preferences
        .insert(tenant_id.to_string(), request.preference);

    match engine.config().update(config) {
        Ok(_) => (Status::Ok, Json(AckResponse::ok())),
        Err(e) => (
            Status::UnprocessableEntity,
            Json(AckResponse::failure(e.to_string())),
        ),
    }
}
