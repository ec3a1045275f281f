use std::collections::BTreeSet;

use crate::models::{Agent, AgentFilters};
use crate::services::query::{Condition, Query, WhereGroup};

/// Check an agent against the directory filters
///
/// The search term is matched case-insensitively against the name, the
/// company and every specialty. The specialty filter needs one specialty to
/// contain it, and the rating has to reach `min_rating`.
#[inline]
pub fn matches_agent(agent: &Agent, filters: &AgentFilters) -> bool {
    if let Some(term) = filters.search_term() {
        let term = term.to_lowercase();
        let hit = agent.name.to_lowercase().contains(&term)
            || agent.company.to_lowercase().contains(&term)
            || has_specialty(agent, &term);
        if !hit {
            return false;
        }
    }

    if let Some(specialty) = filters.specialty() {
        if !has_specialty(agent, &specialty.to_lowercase()) {
            return false;
        }
    }

    if filters
        .min_rating
        .is_some_and(|min| min > 0.0 && agent.rating < min)
    {
        return false;
    }

    true
}

fn has_specialty(agent: &Agent, needle_lower: &str) -> bool {
    agent
        .specialties
        .iter()
        .any(|s| s.to_lowercase().contains(needle_lower))
}

/// Keep the agents that pass `filters`, preserving their order
pub fn apply_agent_filters(agents: Vec<Agent>, filters: &AgentFilters) -> Vec<Agent> {
    agents
        .into_iter()
        .filter(|agent| matches_agent(agent, filters))
        .collect()
}

/// Record query for a free-text agent search, best rated first
pub fn build_agent_search_query(fields: &[&str], term: &str) -> Query {
    let term = term.trim().to_lowercase();
    Query::new(fields)
        .group(WhereGroup::any_of([
            Condition::contains("Name", &term),
            Condition::contains("company", &term),
            Condition::contains("specialties", &term),
        ]))
        .order_by_desc("rating")
}

/// Distinct specialties across all agents, sorted
pub fn collect_specialties(agents: &[Agent]) -> Vec<String> {
    agents
        .iter()
        .flat_map(|agent| agent.specialties.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
