use actix_web::{web, HttpResponse};
use validator::Validate;

use super::{AppState, UserContext};
use crate::models::{PropertyRefRequest, SuccessResponse};
use crate::services::{parse_record_id, ServiceError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/favorites")
            .route(web::get().to(list_favorites))
            .route(web::post().to(add_favorite)),
    )
    .route("/favorites/{property_id}", web::delete().to(remove_favorite));
}

async fn list_favorites(
    state: web::Data<AppState>,
    user: UserContext,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(state.favorites.get_all(&user.user_id).await?))
}

/// Save a listing; saving an already saved listing returns the existing favorite
async fn add_favorite(
    state: web::Data<AppState>,
    user: UserContext,
    body: web::Json<PropertyRefRequest>,
) -> Result<HttpResponse, ServiceError> {
    body.validate()?;
    let favorite = state
        .favorites
        .create(&user.user_id, body.property_id)
        .await?;
    Ok(HttpResponse::Created().json(favorite))
}

async fn remove_favorite(
    state: web::Data<AppState>,
    user: UserContext,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let property_id = parse_record_id(&path, "property")?;
    state
        .favorites
        .delete_by_property_id(&user.user_id, property_id)
        .await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
