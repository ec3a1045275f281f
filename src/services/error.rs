use thiserror::Error;

use super::store::StoreError;
use crate::core::{CompareError, ContactError};
use crate::models::ContactMethod;

/// Errors surfaced by the data-access services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid {0} ID")]
    InvalidId(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Maximum {max} properties can be compared at once")]
    LimitExceeded { max: usize },

    #[error("Invalid contact method. Use \"email\" or \"phone\".")]
    InvalidContactMethod(String),

    #[error("Agent {0} not available")]
    ContactUnavailable(ContactMethod),

    #[error("{0}")]
    DeliveryFailed(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Short machine-readable code for error payloads
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidId(_) => "invalid_id",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::AlreadyExists(_) => "already_exists",
            ServiceError::LimitExceeded { .. } => "limit_exceeded",
            ServiceError::InvalidContactMethod(_) => "invalid_contact_method",
            ServiceError::ContactUnavailable(_) => "contact_unavailable",
            ServiceError::DeliveryFailed(_) => "delivery_failed",
            ServiceError::Validation(_) => "validation_failed",
            ServiceError::Store(StoreError::NotFound(_)) => "not_found",
            ServiceError::Store(StoreError::RequestError(_)) => "backend_unavailable",
            ServiceError::Store(_) => "backend_error",
        }
    }

    /// Turn a backend `NotFound` into a service-level one with a readable message
    pub(crate) fn not_found_as(err: StoreError, message: impl FnOnce() -> String) -> Self {
        match err {
            StoreError::NotFound(_) => ServiceError::NotFound(message()),
            other => ServiceError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

impl From<CompareError> for ServiceError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::Duplicate(_) => ServiceError::AlreadyExists(err.to_string()),
            CompareError::Full { max } => ServiceError::LimitExceeded { max },
        }
    }
}

impl From<ContactError> for ServiceError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::InvalidMethod(method) => ServiceError::InvalidContactMethod(method),
            ContactError::Unavailable(method) => ServiceError::ContactUnavailable(method),
            ContactError::DeliveryFailed => ServiceError::DeliveryFailed(err.to_string()),
        }
    }
}

/// Parse a record id arriving as text, e.g. from a URL path
pub fn parse_record_id(raw: &str, entity: &'static str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ServiceError::InvalidId(entity))
}

pub(crate) fn ensure_valid_id(id: i64, entity: &'static str) -> Result<i64, ServiceError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ServiceError::InvalidId(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id(" 12 ", "property").unwrap(), 12);
        assert!(matches!(
            parse_record_id("abc", "property"),
            Err(ServiceError::InvalidId("property"))
        ));
        assert!(parse_record_id("0", "agent").is_err());
    }

    #[test]
    fn test_compare_error_mapping() {
        let err = ServiceError::from(CompareError::Full { max: 4 });
        assert_eq!(err.to_string(), "Maximum 4 properties can be compared at once");
        assert_eq!(err.code(), "limit_exceeded");

        let err = ServiceError::from(CompareError::Duplicate(3));
        assert_eq!(err.to_string(), "Property already in comparison list");
    }

    #[test]
    fn test_store_not_found_mapping() {
        let err = ServiceError::not_found_as(StoreError::NotFound("x".into()), || {
            "Property 9 not found".to_string()
        });
        assert!(matches!(err, ServiceError::NotFound(msg) if msg == "Property 9 not found"));

        let err = ServiceError::not_found_as(StoreError::Unauthorized, String::new);
        assert_eq!(err.code(), "backend_error");
    }
}
