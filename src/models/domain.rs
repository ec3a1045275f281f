use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::de;

/// Upper bound of the price slider; a `price_max` at or above it is no bound.
pub const PRICE_CEILING: f64 = 2_000_000.0;

/// Property types offered by the filter panel.
pub const PROPERTY_TYPES: [&str; 4] = ["House", "Condo", "Townhouse", "Apartment"];

fn default_status() -> String {
    "active".to_string()
}

/// Geographic position of a listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A listing as stored in the `property` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub state: String,
    #[serde(default, alias = "zipCode", deserialize_with = "de::null_as_default")]
    pub zip_code: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub bedrooms: u32,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub bathrooms: f32,
    #[serde(default, alias = "squareFeet", deserialize_with = "de::null_as_default")]
    pub square_feet: u32,
    #[serde(default, alias = "propertyType", deserialize_with = "de::null_as_default")]
    pub property_type: String,
    #[serde(default, deserialize_with = "de::list_or_csv")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "de::list_or_csv")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "de::coordinates")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "listingDate", deserialize_with = "de::lenient_date")]
    pub listing_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, deserialize_with = "de::bool_or_string")]
    pub featured: bool,
}

/// Links to an agent's social profiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// A listing agent as stored in the `agent` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", alias = "name", default, deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub company: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "de::list_or_csv")]
    pub specialties: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub rating: f64,
    #[serde(default, alias = "reviewCount", deserialize_with = "de::null_as_default")]
    pub review_count: u32,
    #[serde(default, alias = "yearsExperience", deserialize_with = "de::null_as_default")]
    pub years_experience: u32,
    #[serde(default, alias = "salesVolume", deserialize_with = "de::null_as_default")]
    pub sales_volume: f64,
    #[serde(default, alias = "propertiesSold", deserialize_with = "de::null_as_default")]
    pub properties_sold: u32,
    #[serde(default, deserialize_with = "de::list_or_csv")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "de::list_or_csv")]
    pub certifications: Vec<String>,
    #[serde(default, alias = "socialMedia", deserialize_with = "de::social_media")]
    pub social_media: Option<SocialMedia>,
}

impl Agent {
    /// Email address, if one is actually on file
    pub fn contact_email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Phone number, if one is actually on file
    pub fn contact_phone(&self) -> Option<&str> {
        non_blank(self.phone.as_deref())
    }

    /// Contact channels this agent can be reached through, email first
    pub fn contact_methods(&self) -> Vec<ContactMethod> {
        let mut methods = Vec::with_capacity(2);
        if self.contact_email().is_some() {
            methods.push(ContactMethod::Email);
        }
        if self.contact_phone().is_some() {
            methods.push(ContactMethod::Phone);
        }
        methods
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A saved listing for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub owner_id: String,
    #[serde(alias = "propertyId")]
    pub property_id: i64,
    #[serde(default, alias = "savedDate", deserialize_with = "de::lenient_date")]
    pub saved_date: Option<NaiveDate>,
}

/// A listing placed on one user's comparison list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareItem {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub owner_id: String,
    #[serde(alias = "propertyId")]
    pub property_id: i64,
    #[serde(default, alias = "dateAdded", deserialize_with = "de::lenient_timestamp")]
    pub date_added: Option<DateTime<Utc>>,
}

/// School and transit statistics attached to a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default, deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(alias = "propertyId")]
    pub property_id: i64,
    #[serde(default, alias = "schoolRating", deserialize_with = "de::null_as_default")]
    pub school_rating: f64,
    #[serde(default, alias = "elementaryRating", deserialize_with = "de::null_as_default")]
    pub elementary_rating: f64,
    #[serde(default, alias = "middleSchoolRating", deserialize_with = "de::null_as_default")]
    pub middle_school_rating: f64,
    #[serde(default, alias = "highSchoolRating", deserialize_with = "de::null_as_default")]
    pub high_school_rating: f64,
    #[serde(default, alias = "transitScore", deserialize_with = "de::null_as_default")]
    pub transit_score: f64,
    #[serde(default, alias = "busRoutes", deserialize_with = "de::list_or_csv")]
    pub bus_routes: Vec<String>,
    #[serde(default, alias = "nearestStation", deserialize_with = "de::null_as_default")]
    pub nearest_station: String,
    #[serde(default, alias = "avgWaitTime", deserialize_with = "de::null_as_default")]
    pub avg_wait_time: String,
}

/// Listing search criteria
///
/// Zero or missing numeric bounds mean "any", matching the filter panel
/// where 0 is rendered as "Any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilters {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "priceMin")]
    pub price_min: Option<f64>,
    #[serde(default, alias = "priceMax")]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default, alias = "propertyTypes")]
    pub property_types: Vec<String>,
}

impl PropertyFilters {
    /// Trimmed location term, `None` when blank
    pub fn location_term(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    pub fn min_price(&self) -> Option<f64> {
        self.price_min.filter(|p| *p > 0.0)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.price_max.filter(|p| *p > 0.0)
    }

    pub fn min_bedrooms(&self) -> Option<u32> {
        self.bedrooms.filter(|b| *b > 0)
    }

    pub fn min_bathrooms(&self) -> Option<f32> {
        self.bathrooms.filter(|b| *b > 0.0)
    }

    /// Number of filter groups that narrow the result set.
    /// The location term is a search, not a filter, and is not counted.
    pub fn active_filter_count(&self) -> usize {
        let price_active = self.min_price().is_some()
            || self.max_price().is_some_and(|max| max < PRICE_CEILING);

        [
            price_active,
            self.min_bedrooms().is_some(),
            self.min_bathrooms().is_some(),
            !self.property_types.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// Agent directory criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentFilters {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default, alias = "minRating")]
    pub min_rating: Option<f64>,
}

impl AgentFilters {
    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.term.as_deref())
    }

    pub fn specialty(&self) -> Option<&str> {
        non_blank(self.specialty.as_deref())
    }
}

/// How a user reaches an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Email,
    Phone,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a contact method name is neither `email` nor `phone`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContactMethod(pub String);

impl FromStr for ContactMethod {
    type Err = UnknownContactMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(ContactMethod::Email),
            "phone" => Ok(ContactMethod::Phone),
            _ => Err(UnknownContactMethod(s.to_string())),
        }
    }
}

/// Agent details echoed back after a contact attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentContactInfo {
    pub name: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Result of a successful contact attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactOutcome {
    pub success: bool,
    pub message: String,
    #[serde(rename = "contactMethod")]
    pub contact_method: ContactMethod,
    #[serde(rename = "agentInfo")]
    pub agent_info: AgentContactInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_from_sparse_record() {
        let property: Property = serde_json::from_value(json!({
            "Id": 7,
            "title": "Loft",
            "price": 350000,
            "bedrooms": 1,
            "description": null,
            "images": "a.jpg,b.jpg",
            "featured": "false"
        }))
        .unwrap();

        assert_eq!(property.id, 7);
        assert_eq!(property.status, "active");
        assert_eq!(property.images.len(), 2);
        assert!(property.description.is_empty());
        assert!(!property.featured);
    }

    #[test]
    fn test_blank_contact_fields_are_absent() {
        let agent: Agent = serde_json::from_value(json!({
            "Id": 1,
            "Name": "Dana Reyes",
            "email": "  ",
            "phone": "555-0100"
        }))
        .unwrap();

        assert_eq!(agent.contact_email(), None);
        assert_eq!(agent.contact_methods(), vec![ContactMethod::Phone]);
    }

    #[test]
    fn test_contact_method_parse() {
        assert_eq!("Email".parse::<ContactMethod>(), Ok(ContactMethod::Email));
        assert!("fax".parse::<ContactMethod>().is_err());
    }

    #[test]
    fn test_active_filter_count() {
        let mut filters = PropertyFilters::default();
        assert_eq!(filters.active_filter_count(), 0);

        filters.price_max = Some(PRICE_CEILING);
        filters.location = Some("Austin".into());
        assert_eq!(filters.active_filter_count(), 0);

        filters.price_min = Some(100_000.0);
        filters.bedrooms = Some(2);
        filters.property_types = vec!["Condo".into()];
        assert_eq!(filters.active_filter_count(), 3);
    }
}
