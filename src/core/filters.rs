use crate::models::{Property, PropertyFilters};
use crate::services::query::{Condition, Query, WhereGroup};

/// Fields a location term is searched in
pub const LOCATION_FIELDS: [&str; 4] = ["title", "address", "city", "state"];

/// Check whether a listing mentions the location term
///
/// Case-insensitive substring match against title, address, city and state;
/// any one field matching is enough. A blank term matches everything.
#[inline]
pub fn matches_location(property: &Property, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    [
        &property.title,
        &property.address,
        &property.city,
        &property.state,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

/// Check a listing against every active filter
///
/// Location, price bounds, bedroom and bathroom minimums and the property
/// type set all have to hold. Within the type set any selected type matches.
#[inline]
pub fn matches_filters(property: &Property, filters: &PropertyFilters) -> bool {
    if let Some(term) = filters.location_term() {
        if !matches_location(property, term) {
            return false;
        }
    }

    if filters.min_price().is_some_and(|min| property.price < min) {
        return false;
    }

    if filters.max_price().is_some_and(|max| property.price > max) {
        return false;
    }

    if filters
        .min_bedrooms()
        .is_some_and(|min| property.bedrooms < min)
    {
        return false;
    }

    if filters
        .min_bathrooms()
        .is_some_and(|min| property.bathrooms < min)
    {
        return false;
    }

    if !filters.property_types.is_empty()
        && !filters
            .property_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&property.property_type))
    {
        return false;
    }

    true
}

/// Keep the listings that pass `filters`, preserving their order
pub fn apply_filters(properties: Vec<Property>, filters: &PropertyFilters) -> Vec<Property> {
    properties
        .into_iter()
        .filter(|property| matches_filters(property, filters))
        .collect()
}

/// Express `filters` as a record query so the backend can narrow the scan
///
/// The location term becomes one OR group over [`LOCATION_FIELDS`]; every
/// other filter is a plain AND condition.
pub fn build_search_query(fields: &[&str], filters: &PropertyFilters) -> Query {
    let mut query = Query::new(fields).order_by_desc("listing_date");

    if let Some(term) = filters.location_term() {
        query = query.group(WhereGroup::any_of(
            LOCATION_FIELDS
                .iter()
                .map(|field| Condition::contains(field, term)),
        ));
    }

    if let Some(min) = filters.min_price() {
        query = query.filter(Condition::at_least("price", min));
    }
    if let Some(max) = filters.max_price() {
        query = query.filter(Condition::at_most("price", max));
    }
    if let Some(min) = filters.min_bedrooms() {
        query = query.filter(Condition::at_least("bedrooms", min));
    }
    if let Some(min) = filters.min_bathrooms() {
        query = query.filter(Condition::at_least("bathrooms", min));
    }
    if !filters.property_types.is_empty() {
        query = query.filter(Condition::exact_match(
            "property_type",
            filters.property_types.iter(),
        ));
    }

    query
}
