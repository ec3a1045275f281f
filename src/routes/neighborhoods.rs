use actix_web::{web, HttpResponse};

use super::AppState;
use crate::models::{NeighborhoodChanges, NewNeighborhood, SuccessResponse};
use crate::services::{parse_record_id, ServiceError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/neighborhoods")
            .route(web::get().to(list_neighborhoods))
            .route(web::post().to(create_neighborhood)),
    )
    .service(
        web::resource("/neighborhoods/{id}")
            .route(web::get().to(get_neighborhood))
            .route(web::put().to(update_neighborhood))
            .route(web::delete().to(delete_neighborhood)),
    );
}

async fn list_neighborhoods(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(state.neighborhoods.get_all().await?))
}

async fn get_neighborhood(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "neighborhood")?;
    Ok(HttpResponse::Ok().json(state.neighborhoods.get_by_id(id).await?))
}

async fn create_neighborhood(
    state: web::Data<AppState>,
    body: web::Json<NewNeighborhood>,
) -> Result<HttpResponse, ServiceError> {
    let created = state.neighborhoods.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

async fn update_neighborhood(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NeighborhoodChanges>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "neighborhood")?;
    Ok(HttpResponse::Ok().json(state.neighborhoods.update(id, body.into_inner()).await?))
}

async fn delete_neighborhood(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "neighborhood")?;
    state.neighborhoods.delete(id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
