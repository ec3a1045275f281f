use std::sync::Arc;
use validator::Validate;

use super::error::{ensure_valid_id, ServiceError};
use super::property::with_id;
use super::query::{Condition, Query};
use super::store::{decode_record, decode_records, first_record, RecordStore};
use crate::core::contact::{build_outcome, resolve_contact, ContactError, EmailSimulator};
use crate::core::search::{apply_agent_filters, build_agent_search_query, collect_specialties};
use crate::models::{
    Agent, AgentChanges, AgentFilters, ContactMethod, ContactOutcome, ContactUserInfo, NewAgent,
};

pub const AGENT_FIELDS: &[&str] = &[
    "Name",
    "title",
    "company",
    "email",
    "phone",
    "image",
    "bio",
    "specialties",
    "rating",
    "review_count",
    "years_experience",
    "sales_volume",
    "properties_sold",
    "languages",
    "certifications",
    "social_media",
];

/// Agent directory and contact
pub struct AgentService {
    store: Arc<dyn RecordStore>,
    table: String,
    email: EmailSimulator,
}

impl AgentService {
    pub fn new(store: Arc<dyn RecordStore>, table: String, email: EmailSimulator) -> Self {
        Self {
            store,
            table,
            email,
        }
    }

    /// All agents, best rated first
    pub async fn get_all(&self) -> Result<Vec<Agent>, ServiceError> {
        let query = Query::new(AGENT_FIELDS).order_by_desc("rating");
        self.fetch(&query).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Agent, ServiceError> {
        let id = ensure_valid_id(id, "agent")?;
        let record = self
            .store
            .get_record_by_id(&self.table, id, &Query::new(AGENT_FIELDS))
            .await
            .map_err(|e| ServiceError::not_found_as(e, || format!("Agent {} not found", id)))?;
        Ok(decode_record(record, &self.table)?)
    }

    /// Directory search by term, specialty and minimum rating
    ///
    /// A blank term lists every agent before the remaining filters apply.
    pub async fn search(&self, filters: &AgentFilters) -> Result<Vec<Agent>, ServiceError> {
        let agents = match filters.search_term() {
            Some(term) => {
                self.fetch(&build_agent_search_query(AGENT_FIELDS, term))
                    .await?
            }
            None => self.get_all().await?,
        };
        Ok(apply_agent_filters(agents, filters))
    }

    pub async fn filter_by_specialty(&self, specialty: &str) -> Result<Vec<Agent>, ServiceError> {
        let specialty = specialty.trim();
        if specialty.is_empty() {
            return self.get_all().await;
        }
        let query = Query::new(AGENT_FIELDS)
            .filter(Condition::contains("specialties", specialty))
            .order_by_desc("rating");
        self.fetch(&query).await
    }

    pub async fn filter_by_rating(&self, min_rating: f64) -> Result<Vec<Agent>, ServiceError> {
        let query = Query::new(AGENT_FIELDS)
            .filter(Condition::at_least("rating", min_rating))
            .order_by_desc("rating");
        self.fetch(&query).await
    }

    /// Distinct specialties offered across the directory
    pub async fn get_specialties(&self) -> Result<Vec<String>, ServiceError> {
        let query = Query::new(&["specialties"]);
        let agents: Vec<Agent> = self.fetch(&query).await?;
        Ok(collect_specialties(&agents))
    }

    pub async fn create(&self, agent: NewAgent) -> Result<Agent, ServiceError> {
        agent.validate()?;
        let record = serde_json::to_value(&agent)
            .map_err(|e| ServiceError::Validation(format!("Unserializable agent: {}", e)))?;

        let created = self.store.create_records(&self.table, vec![record]).await?;
        let created: Agent = decode_record(first_record(created, "create")?, &self.table)?;
        tracing::info!("Created agent {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: AgentChanges) -> Result<Agent, ServiceError> {
        let id = ensure_valid_id(id, "agent")?;
        changes.validate()?;

        let updated = self
            .store
            .update_records(&self.table, vec![with_id(id, &changes)?])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || format!("Agent {} not found", id)))?;
        Ok(decode_record(first_record(updated, "update")?, &self.table)?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let id = ensure_valid_id(id, "agent")?;
        self.store
            .delete_records(&self.table, &[id])
            .await
            .map_err(|e| ServiceError::not_found_as(e, || format!("Agent {} not found", id)))?;
        tracing::info!("Deleted agent {}", id);
        Ok(())
    }

    /// Channels through which the agent can be reached
    pub async fn get_contact_methods(&self, id: i64) -> Result<Vec<ContactMethod>, ServiceError> {
        Ok(self.get_by_id(id).await?.contact_methods())
    }

    /// Reach out to an agent by email or phone
    ///
    /// Email delivery is simulated and fails at the configured rate. Phone
    /// contact only hands back the number to dial.
    pub async fn contact_agent(
        &self,
        id: i64,
        method: &str,
        message: Option<&str>,
        user_info: Option<&ContactUserInfo>,
    ) -> Result<ContactOutcome, ServiceError> {
        let agent = self.get_by_id(id).await?;
        let method: ContactMethod = method
            .parse()
            .map_err(|e: crate::models::UnknownContactMethod| ContactError::InvalidMethod(e.0))?;
        let address = resolve_contact(&agent, method)?;

        if method == ContactMethod::Email && !self.email.attempt() {
            tracing::warn!("Simulated email delivery to agent {} failed", agent.id);
            return Err(ContactError::DeliveryFailed.into());
        }

        tracing::info!(
            agent_id = agent.id,
            method = %method,
            from = user_info.and_then(|u| u.name.as_deref()).unwrap_or("anonymous"),
            message_len = message.map_or(0, str::len),
            "Agent contact request"
        );
        Ok(build_outcome(&agent, method, address))
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Agent>, ServiceError> {
        let records = self.store.fetch_records(&self.table, query).await?;
        Ok(decode_records(records, &self.table))
    }
}
