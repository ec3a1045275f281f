use thiserror::Error;

use crate::models::CompareItem;

/// Default capacity of a comparison list
pub const MAX_COMPARE_ITEMS: usize = 4;

/// Why a listing cannot join the comparison list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("Property already in comparison list")]
    Duplicate(i64),

    #[error("Maximum {max} properties can be compared at once")]
    Full { max: usize },
}

/// Snapshot of one user's comparison list
///
/// Holds at most `max_items` distinct listings.
#[derive(Debug, Clone)]
pub struct CompareList {
    property_ids: Vec<i64>,
    max_items: usize,
}

impl CompareList {
    pub fn new(items: &[CompareItem], max_items: usize) -> Self {
        Self {
            property_ids: items.iter().map(|item| item.property_id).collect(),
            max_items,
        }
    }

    pub fn len(&self) -> usize {
        self.property_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.property_ids.is_empty()
    }

    pub fn contains(&self, property_id: i64) -> bool {
        self.property_ids.contains(&property_id)
    }

    pub fn remaining(&self) -> usize {
        self.max_items.saturating_sub(self.len())
    }

    /// Duplicates are reported before capacity
    pub fn check_can_add(&self, property_id: i64) -> Result<(), CompareError> {
        if self.contains(property_id) {
            return Err(CompareError::Duplicate(property_id));
        }
        if self.len() >= self.max_items {
            return Err(CompareError::Full {
                max: self.max_items,
            });
        }
        Ok(())
    }
}
