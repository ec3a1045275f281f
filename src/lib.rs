//! Homescope - real estate listing service
//!
//! This library backs the Homescope listing site: property search and the
//! featured strip, an agent directory with contact, per-user favorites and
//! comparison lists, and neighborhood statistics. Records live in a hosted
//! record API or, for local work, in an in-memory store seeded from fixtures.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{apply_filters, CompareList, EmailSimulator, MAX_COMPARE_ITEMS};
pub use crate::models::{Agent, CompareItem, Favorite, Neighborhood, Property, PropertyFilters};
pub use crate::services::{build_store, RecordStore, ServiceError, StoreError};
