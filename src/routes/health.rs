use actix_web::{web, HttpResponse, Responder};

use super::AppState;
use crate::models::HealthResponse;
use crate::services::Query;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health check endpoint
///
/// Probes the record backend with a one-row read of the listing table.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let probe = Query::new(&[]).page(1, 0);
    let healthy = match state.store.fetch_records(&state.tables.property, &probe).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Record backend health probe failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.store.backend_name().to_string(),
        cache: state.properties.cache_stats(),
        timestamp: chrono::Utc::now(),
    })
}
