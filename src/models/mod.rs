// Model exports
pub mod de;
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Agent, AgentContactInfo, AgentFilters, CompareItem, ContactMethod, ContactOutcome,
    Coordinates, Favorite, Neighborhood, Property, PropertyFilters, SocialMedia,
    UnknownContactMethod, PRICE_CEILING, PROPERTY_TYPES,
};
pub use requests::{
    AgentChanges, AgentSearchParams, ContactAgentRequest, ContactUserInfo, NeighborhoodChanges,
    NewAgent, NewNeighborhood, NewProperty, PropertyChanges, PropertyRefRequest,
    PropertySearchParams,
};
pub use responses::{
    AgentListResponse, CompareListResponse, ErrorResponse, HealthResponse,
    PropertySearchResponse, SuccessResponse,
};
