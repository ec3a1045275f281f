use serde::{Deserialize, Serialize};
use validator::Validate;

use super::de::split_csv;
use super::domain::{AgentFilters, Coordinates, PropertyFilters, SocialMedia};

/// Query string of the listing search endpoint
///
/// `propertyTypes` is a comma separated list, e.g. `House,Condo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertySearchParams {
    #[serde(default, alias = "search")]
    pub location: Option<String>,
    #[serde(default, rename = "priceMin")]
    pub price_min: Option<f64>,
    #[serde(default, rename = "priceMax")]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default, rename = "propertyTypes")]
    pub property_types: Option<String>,
}

impl From<PropertySearchParams> for PropertyFilters {
    fn from(params: PropertySearchParams) -> Self {
        PropertyFilters {
            location: params.location,
            price_min: params.price_min,
            price_max: params.price_max,
            bedrooms: params.bedrooms,
            bathrooms: params.bathrooms,
            property_types: params
                .property_types
                .as_deref()
                .map(split_csv)
                .unwrap_or_default(),
        }
    }
}

/// Query string of the agent directory endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentSearchParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default, rename = "minRating")]
    pub min_rating: Option<f64>,
}

impl From<AgentSearchParams> for AgentFilters {
    fn from(params: AgentSearchParams) -> Self {
        AgentFilters {
            term: params.search,
            specialty: params.specialty,
            min_rating: params.min_rating,
        }
    }
}

/// Listing to be created
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProperty {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, alias = "zipCode")]
    pub zip_code: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub bathrooms: f32,
    #[serde(default, alias = "squareFeet")]
    pub square_feet: u32,
    #[serde(alias = "propertyType")]
    #[validate(length(min = 1))]
    pub property_type: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
}

/// Partial update of a listing; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PropertyChanges {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, alias = "zipCode", skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f32>,
    #[serde(default, alias = "squareFeet", skip_serializing_if = "Option::is_none")]
    pub square_feet: Option<u32>,
    #[serde(default, alias = "propertyType", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "listingDate", skip_serializing_if = "Option::is_none")]
    pub listing_date: Option<chrono::NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// Agent to be created
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAgent {
    #[serde(rename = "Name", alias = "name")]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default, alias = "reviewCount")]
    pub review_count: u32,
    #[serde(default, alias = "yearsExperience")]
    pub years_experience: u32,
    #[serde(default, alias = "salesVolume")]
    pub sales_volume: f64,
    #[serde(default, alias = "propertiesSold")]
    pub properties_sold: u32,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, alias = "socialMedia", skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
}

/// Partial update of an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AgentChanges {
    #[serde(rename = "Name", alias = "name", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    #[serde(default, alias = "reviewCount", skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, alias = "yearsExperience", skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<u32>,
    #[serde(default, alias = "salesVolume", skip_serializing_if = "Option::is_none")]
    pub sales_volume: Option<f64>,
    #[serde(default, alias = "propertiesSold", skip_serializing_if = "Option::is_none")]
    pub properties_sold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(default, alias = "socialMedia", skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
}

/// Neighborhood statistics to be created
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewNeighborhood {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "propertyId")]
    #[validate(range(min = 1))]
    pub property_id: i64,
    #[serde(default, alias = "schoolRating")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub school_rating: f64,
    #[serde(default, alias = "elementaryRating")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub elementary_rating: f64,
    #[serde(default, alias = "middleSchoolRating")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub middle_school_rating: f64,
    #[serde(default, alias = "highSchoolRating")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub high_school_rating: f64,
    #[serde(default, alias = "transitScore")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub transit_score: f64,
    #[serde(default, alias = "busRoutes")]
    pub bus_routes: Vec<String>,
    #[serde(default, alias = "nearestStation")]
    pub nearest_station: String,
    #[serde(default, alias = "avgWaitTime")]
    pub avg_wait_time: String,
}

/// Partial update of neighborhood statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NeighborhoodChanges {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "schoolRating", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub school_rating: Option<f64>,
    #[serde(default, alias = "elementaryRating", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub elementary_rating: Option<f64>,
    #[serde(default, alias = "middleSchoolRating", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub middle_school_rating: Option<f64>,
    #[serde(default, alias = "highSchoolRating", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub high_school_rating: Option<f64>,
    #[serde(default, alias = "transitScore", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub transit_score: Option<f64>,
    #[serde(default, alias = "busRoutes", skip_serializing_if = "Option::is_none")]
    pub bus_routes: Option<Vec<String>>,
    #[serde(default, alias = "nearestStation", skip_serializing_if = "Option::is_none")]
    pub nearest_station: Option<String>,
    #[serde(default, alias = "avgWaitTime", skip_serializing_if = "Option::is_none")]
    pub avg_wait_time: Option<String>,
}

/// Body of the favorite and compare "add" endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PropertyRefRequest {
    #[serde(rename = "propertyId", alias = "property_id")]
    #[validate(range(min = 1))]
    pub property_id: i64,
}

/// Who is reaching out to an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUserInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request to contact an agent
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactAgentRequest {
    #[serde(rename = "contactMethod", alias = "method")]
    #[validate(length(min = 1))]
    pub contact_method: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    #[serde(default, rename = "userInfo")]
    pub user_info: Option<ContactUserInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_into_filters() {
        let params = PropertySearchParams {
            location: Some("Austin".to_string()),
            bedrooms: Some(2),
            property_types: Some("House, Condo".to_string()),
            ..Default::default()
        };

        let filters = PropertyFilters::from(params);
        assert_eq!(filters.property_types, vec!["House", "Condo"]);
        assert_eq!(filters.min_bedrooms(), Some(2));
    }

    #[test]
    fn test_new_property_validation() {
        let property: NewProperty = serde_json::from_value(serde_json::json!({
            "title": "",
            "price": 100000,
            "propertyType": "House"
        }))
        .unwrap();

        assert!(property.validate().is_err());
    }
}
