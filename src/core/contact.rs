use rand::Rng;
use thiserror::Error;

use crate::models::{Agent, AgentContactInfo, ContactMethod, ContactOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Invalid contact method. Use \"email\" or \"phone\".")]
    InvalidMethod(String),

    #[error("Agent {0} not available")]
    Unavailable(ContactMethod),

    #[error("Email service temporarily unavailable")]
    DeliveryFailed,
}

/// Resolve the address used to reach `agent` through `method`
pub fn resolve_contact(agent: &Agent, method: ContactMethod) -> Result<&str, ContactError> {
    let address = match method {
        ContactMethod::Email => agent.contact_email(),
        ContactMethod::Phone => agent.contact_phone(),
    };
    address.ok_or(ContactError::Unavailable(method))
}

/// Simulated email delivery
///
/// No mail is sent; each attempt fails with probability `failure_rate`.
#[derive(Debug, Clone, Copy)]
pub struct EmailSimulator {
    failure_rate: f64,
}

impl EmailSimulator {
    pub fn new(failure_rate: f64) -> Self {
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    pub fn attempt(&self) -> bool {
        rand::thread_rng().gen::<f64>() >= self.failure_rate
    }
}

/// Outcome reported back to the user after a successful attempt
pub fn build_outcome(agent: &Agent, method: ContactMethod, address: &str) -> ContactOutcome {
    let (message, email, phone) = match method {
        ContactMethod::Email => (
            format!("Email sent successfully to {}", agent.name),
            Some(address.to_string()),
            None,
        ),
        ContactMethod::Phone => (
            format!("Initiating call to {}", agent.name),
            None,
            Some(address.to_string()),
        ),
    };

    ContactOutcome {
        success: true,
        message,
        contact_method: method,
        agent_info: AgentContactInfo {
            name: agent.name.clone(),
            company: agent.company.clone(),
            email,
            phone,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(email: Option<&str>, phone: Option<&str>) -> Agent {
        serde_json::from_value(serde_json::json!({
            "Id": 1,
            "Name": "Maya Thompson",
            "company": "Lone Star Realty",
            "email": email,
            "phone": phone,
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_email_is_unavailable() {
        let agent = agent(None, Some("555-0100"));
        assert_eq!(
            resolve_contact(&agent, ContactMethod::Email),
            Err(ContactError::Unavailable(ContactMethod::Email))
        );
        assert_eq!(resolve_contact(&agent, ContactMethod::Phone), Ok("555-0100"));
    }

    #[test]
    fn test_simulator_extremes() {
        assert!((0..100).all(|_| EmailSimulator::new(0.0).attempt()));
        assert!((0..100).all(|_| !EmailSimulator::new(1.0).attempt()));
        assert_eq!(EmailSimulator::new(7.0).failure_rate(), 1.0);
    }

    #[test]
    fn test_outcome_carries_channel_details() {
        let agent = agent(Some("maya@example.com"), None);
        let outcome = build_outcome(&agent, ContactMethod::Email, "maya@example.com");
        assert!(outcome.success);
        assert_eq!(outcome.message, "Email sent successfully to Maya Thompson");
        assert_eq!(outcome.agent_info.email.as_deref(), Some("maya@example.com"));
        assert!(outcome.agent_info.phone.is_none());
    }
}
