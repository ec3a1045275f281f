//! Lenient field decoders for records coming back from the record API.
//!
//! The backend stores multi-value text as comma separated strings, nested
//! objects as JSON text, and returns `null` for any column that was never set.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{Coordinates, SocialMedia};

/// Treat `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

/// Accept `["a", "b"]` as well as `"a, b"`.
pub fn list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<ListOrCsv>::deserialize(deserializer)? {
        Some(ListOrCsv::List(items)) => items,
        Some(ListOrCsv::Csv(text)) => split_csv(&text),
        None => Vec::new(),
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

/// Split a comma separated string, dropping blanks.
pub fn split_csv(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

pub fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<BoolOrText>::deserialize(deserializer)? {
        Some(BoolOrText::Bool(flag)) => flag,
        Some(BoolOrText::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordinatesRepr {
    Object(Coordinates),
    Text(String),
}

/// Coordinates arrive either as `{"lat": .., "lng": ..}` or `"lat,lng"`.
/// Unparseable text is dropped rather than failing the whole listing.
pub fn coordinates<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CoordinatesRepr>::deserialize(deserializer)? {
        Some(CoordinatesRepr::Object(coords)) => Some(coords),
        Some(CoordinatesRepr::Text(text)) => parse_coordinates(&text),
        None => None,
    })
}

fn parse_coordinates(text: &str) -> Option<Coordinates> {
    let (lat, lng) = text.split_once(',')?;
    Some(Coordinates {
        lat: lat.trim().parse().ok()?,
        lng: lng.trim().parse().ok()?,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SocialRepr {
    Object(SocialMedia),
    Text(String),
}

pub fn social_media<'de, D>(deserializer: D) -> Result<Option<SocialMedia>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<SocialRepr>::deserialize(deserializer)? {
        Some(SocialRepr::Object(links)) => Some(links),
        Some(SocialRepr::Text(text)) => serde_json::from_str(&text).ok(),
        None => None,
    })
}

/// Dates are stored as `YYYY-MM-DD`, but some rows carry a full timestamp.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let day = text.get(..10).unwrap_or(&text);
    Ok(NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// Timestamps in RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC) or a bare date.
/// Anything else decodes to `None` rather than failing the row.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let text = text.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(stamp.with_timezone(&Utc)));
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        });
    Ok(naive.map(|n| n.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "list_or_csv")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "coordinates")]
        coords: Option<Coordinates>,
        #[serde(default, deserialize_with = "bool_or_string")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_date")]
        day: Option<NaiveDate>,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_csv_and_list_forms() {
        let sample: Sample = serde_json::from_value(json!({"tags": "Pool, Garage,,"})).unwrap();
        assert_eq!(sample.tags, vec!["Pool", "Garage"]);

        let sample: Sample = serde_json::from_value(json!({"tags": ["Pool", " Garage "]})).unwrap();
        assert_eq!(sample.tags, vec!["Pool", "Garage"]);

        let sample: Sample = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(sample.tags.is_empty());
    }

    #[test]
    fn test_coordinates_text() {
        let sample: Sample = serde_json::from_value(json!({"coords": "30.26, -97.74"})).unwrap();
        let coords = sample.coords.unwrap();
        assert_eq!(coords.lat, 30.26);
        assert_eq!(coords.lng, -97.74);

        let sample: Sample = serde_json::from_value(json!({"coords": "somewhere"})).unwrap();
        assert!(sample.coords.is_none());
    }

    #[test]
    fn test_flag_and_date() {
        let sample: Sample =
            serde_json::from_value(json!({"flag": "true", "day": "2024-03-05T10:00:00Z"})).unwrap();
        assert!(sample.flag);
        assert_eq!(sample.day, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .map(|n| n.and_utc());

        for text in ["2024-05-01T10:00:00Z", "2024-05-01 10:00:00", "2024-05-01T12:00:00+02:00"] {
            let sample: Sample = serde_json::from_value(json!({ "at": text })).unwrap();
            assert_eq!(sample.at, expected, "{}", text);
        }

        let sample: Sample = serde_json::from_value(json!({"at": "yesterday"})).unwrap();
        assert!(sample.at.is_none());
    }
}
