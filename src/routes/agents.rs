use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use super::AppState;
use crate::models::{
    AgentChanges, AgentFilters, AgentListResponse, AgentSearchParams, ContactAgentRequest,
    NewAgent, SuccessResponse,
};
use crate::services::{parse_record_id, ServiceError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/agents")
            .route(web::get().to(list_agents))
            .route(web::post().to(create_agent)),
    )
    .route("/agents/specialties", web::get().to(list_specialties))
    .service(
        web::resource("/agents/{id}")
            .route(web::get().to(get_agent))
            .route(web::put().to(update_agent))
            .route(web::delete().to(delete_agent)),
    )
    .route("/agents/{id}/contact-methods", web::get().to(contact_methods))
    .route("/agents/{id}/contact", web::post().to(contact_agent));
}

/// Agent directory
///
/// GET /api/v1/agents?search=condo&specialty=Relocation&minRating=4.5
async fn list_agents(
    state: web::Data<AppState>,
    params: web::Query<AgentSearchParams>,
) -> Result<HttpResponse, ServiceError> {
    let filters = AgentFilters::from(params.into_inner());
    let agents = state.agents.search(&filters).await?;

    Ok(HttpResponse::Ok().json(AgentListResponse {
        total_results: agents.len(),
        agents,
    }))
}

async fn list_specialties(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(state.agents.get_specialties().await?))
}

async fn get_agent(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "agent")?;
    Ok(HttpResponse::Ok().json(state.agents.get_by_id(id).await?))
}

async fn create_agent(
    state: web::Data<AppState>,
    body: web::Json<NewAgent>,
) -> Result<HttpResponse, ServiceError> {
    let created = state.agents.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

async fn update_agent(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AgentChanges>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "agent")?;
    Ok(HttpResponse::Ok().json(state.agents.update(id, body.into_inner()).await?))
}

async fn delete_agent(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "agent")?;
    state.agents.delete(id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

async fn contact_methods(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "agent")?;
    let methods = state.agents.get_contact_methods(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "agentId": id, "methods": methods })))
}

/// Contact an agent
///
/// POST /api/v1/agents/{id}/contact
///
/// Request body:
/// ```json
/// {
///   "contactMethod": "email",
///   "message": "Is the loft still available?",
///   "userInfo": { "name": "Sam", "email": "sam@example.com" }
/// }
/// ```
async fn contact_agent(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ContactAgentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let id = parse_record_id(&path, "agent")?;
    body.validate()?;

    let request = body.into_inner();
    let outcome = state
        .agents
        .contact_agent(
            id,
            &request.contact_method,
            request.message.as_deref(),
            request.user_info.as_ref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}
