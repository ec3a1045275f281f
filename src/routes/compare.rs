use actix_web::{web, HttpResponse};
use validator::Validate;

use super::{AppState, UserContext};
use crate::models::{CompareListResponse, PropertyRefRequest, SuccessResponse};
use crate::services::{parse_record_id, ServiceError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/compare")
            .route(web::get().to(get_compare_list))
            .route(web::post().to(add_to_compare))
            .route(web::delete().to(clear_compare)),
    )
    .route("/compare/properties", web::get().to(compare_properties))
    .route("/compare/{property_id}", web::delete().to(remove_from_compare));
}

async fn get_compare_list(
    state: web::Data<AppState>,
    user: UserContext,
) -> Result<HttpResponse, ServiceError> {
    let items = state.compare.get_compare_list(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(CompareListResponse {
        count: items.len(),
        max_items: state.compare.max_items(),
        items,
    }))
}

/// Full listings on the user's comparison list
async fn compare_properties(
    state: web::Data<AppState>,
    user: UserContext,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(state.compare.get_compare_properties(&user.user_id).await?))
}

/// Add a listing to the comparison list
///
/// POST /api/v1/compare
///
/// Request body:
/// ```json
/// { "propertyId": 4 }
/// ```
///
/// Rejected with 409 when the listing is already on the list or the list is full.
async fn add_to_compare(
    state: web::Data<AppState>,
    user: UserContext,
    body: web::Json<PropertyRefRequest>,
) -> Result<HttpResponse, ServiceError> {
    body.validate()?;
    let item = state
        .compare
        .add_to_compare(&user.user_id, body.property_id)
        .await?;
    Ok(HttpResponse::Created().json(item))
}

async fn remove_from_compare(
    state: web::Data<AppState>,
    user: UserContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let property_id = parse_record_id(&path, "property")?;
    state
        .compare
        .remove_from_compare(&user.user_id, property_id)
        .await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

async fn clear_compare(
    state: web::Data<AppState>,
    user: UserContext,
) -> Result<HttpResponse, ServiceError> {
    state.compare.clear_compare(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
