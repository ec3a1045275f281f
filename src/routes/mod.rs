// Route exports
pub mod agents;
pub mod compare;
pub mod favorites;
pub mod health;
pub mod neighborhoods;
pub mod properties;

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{error, web, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};
use std::sync::Arc;

use crate::config::{Settings, TableSettings};
use crate::core::contact::EmailSimulator;
use crate::models::ErrorResponse;
use crate::services::{
    AgentService, CompareService, FavoriteService, ListingCache, NeighborhoodService,
    PropertyService, RecordStore, ServiceError, StoreError,
};

/// Header carrying the id of the user whose favorites and comparison list are used
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub tables: TableSettings,
    pub properties: Arc<PropertyService>,
    pub agents: Arc<AgentService>,
    pub favorites: Arc<FavoriteService>,
    pub compare: Arc<CompareService>,
    pub neighborhoods: Arc<NeighborhoodService>,
}

impl AppState {
    /// Wire every service to one record backend
    pub fn build(store: Arc<dyn RecordStore>, settings: &Settings) -> Self {
        let tables = settings.tables.clone();
        let listings = &settings.listings;

        let properties = Arc::new(PropertyService::new(
            store.clone(),
            tables.property.clone(),
            listings.featured_limit,
            ListingCache::new(listings.cache_capacity, listings.cache_ttl_secs),
        ));
        let agents = Arc::new(AgentService::new(
            store.clone(),
            tables.agent.clone(),
            EmailSimulator::new(settings.contact.email_failure_rate),
        ));
        let favorites = Arc::new(FavoriteService::new(store.clone(), tables.favorite.clone()));
        let compare = Arc::new(CompareService::new(
            store.clone(),
            tables.compare_item.clone(),
            properties.clone(),
            listings.compare_max_items,
        ));
        let neighborhoods = Arc::new(NeighborhoodService::new(
            store.clone(),
            tables.neighborhood.clone(),
        ));

        Self {
            store,
            tables,
            properties,
            agents,
            favorites,
            compare,
            neighborhoods,
        }
    }
}

/// The user a favorites or comparison request acts for
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
}

impl FromRequest for UserContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        ready(match user_id {
            Some(user_id) => Ok(UserContext {
                user_id: user_id.to_string(),
            }),
            None => Err(JsonError {
                error: "missing_user".to_string(),
                message: format!("{} header is required", USER_ID_HEADER),
                status_code: 400,
            }
            .into()),
        })
    }
}

impl error::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidId(_)
            | ServiceError::Validation(_)
            | ServiceError::InvalidContactMethod(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) | ServiceError::Store(StoreError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::AlreadyExists(_) | ServiceError::LimitExceeded { .. } => {
                StatusCode::CONFLICT
            }
            ServiceError::ContactUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::DeliveryFailed(_) | ServiceError::Store(StoreError::RequestError(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::info!("Request rejected: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// JSON error response for payload and header errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query string error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// App-level extractor configuration shared by the server and the tests
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .configure(configure_routes);
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(properties::configure)
            .configure(agents::configure)
            .configure(favorites::configure)
            .configure(compare::configure)
            .configure(neighborhoods::configure),
    );
}
