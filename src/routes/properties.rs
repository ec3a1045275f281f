use actix_web::{web, HttpResponse};

use super::AppState;
use crate::models::{
    NewProperty, PropertyChanges, PropertyFilters, PropertySearchParams, PropertySearchResponse,
    SuccessResponse,
};
use crate::services::{parse_record_id, ServiceError};

/// Configure listing routes; `/properties/featured` must precede `/properties/{id}`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/properties")
            .route(web::get().to(search_properties))
            .route(web::post().to(create_property)),
    )
    .route("/properties/featured", web::get().to(featured_properties))
    .service(
        web::resource("/properties/{id}")
            .route(web::get().to(get_property))
            .route(web::put().to(update_property))
            .route(web::delete().to(delete_property)),
    )
    .route(
        "/properties/{id}/neighborhood",
        web::get().to(property_neighborhood),
    );
}

/// Listing search
///
/// GET /api/v1/properties?location=austin&priceMin=200000&bedrooms=2&propertyTypes=House,Condo
///
/// Without parameters every listing is returned, newest first.
async fn search_properties(
    state: web::Data<AppState>,
    params: web::Query<PropertySearchParams>,
) -> Result<HttpResponse, ServiceError> {
    let filters = PropertyFilters::from(params.into_inner());
    let properties = state.properties.search(&filters).await?;

    Ok(HttpResponse::Ok().json(PropertySearchResponse {
        total_results: properties.len(),
        active_filters: filters.active_filter_count(),
        properties,
    }))
}

async fn featured_properties(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(state.properties.get_featured().await?))
}

async fn get_property(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "property")?;
    Ok(HttpResponse::Ok().json(state.properties.get_by_id(id).await?))
}

async fn create_property(
    state: web::Data<AppState>,
    body: web::Json<NewProperty>,
) -> Result<HttpResponse, ServiceError> {
    let created = state.properties.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

async fn update_property(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PropertyChanges>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "property")?;
    Ok(HttpResponse::Ok().json(state.properties.update(id, body.into_inner()).await?))
}

async fn delete_property(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "property")?;
    state.properties.delete(id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

/// School and transit statistics for one listing
async fn property_neighborhood(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "property")?;
    Ok(HttpResponse::Ok().json(state.neighborhoods.get_by_property_id(id).await?))
}
