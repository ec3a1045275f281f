// Core search, comparison and contact rules
pub mod compare;
pub mod contact;
pub mod filters;
pub mod search;

pub use compare::{CompareError, CompareList, MAX_COMPARE_ITEMS};
pub use contact::{build_outcome, resolve_contact, ContactError, EmailSimulator};
pub use filters::{apply_filters, build_search_query, matches_filters, matches_location, LOCATION_FIELDS};
pub use search::{apply_agent_filters, build_agent_search_query, collect_specialties, matches_agent};
