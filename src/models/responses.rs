use serde::{Deserialize, Serialize};

use super::domain::{Agent, CompareItem, Property};

/// Response for the listing search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySearchResponse {
    pub properties: Vec<Property>,
    pub total_results: usize,
    pub active_filters: usize,
}

/// Response for the agent directory endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentListResponse {
    pub agents: Vec<Agent>,
    pub total_results: usize,
}

/// Response for the comparison list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareListResponse {
    pub items: Vec<CompareItem>,
    pub count: usize,
    pub max_items: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub cache: crate::services::CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Acknowledgement for deletes and clears
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
