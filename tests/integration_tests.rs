// Integration tests for Homescope services over the fixture data

use homescope::config::Settings;
use homescope::models::{ContactMethod, PropertyChanges, PropertyFilters};
use homescope::routes::AppState;
use homescope::services::{MemoryStore, ServiceError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.data.fixtures_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"));
    settings.data.mock_delay_ms = 0;
    settings
}

fn create_state(email_failure_rate: f64) -> AppState {
    let mut settings = test_settings();
    settings.contact.email_failure_rate = email_failure_rate;

    let store = MemoryStore::from_fixtures(
        &settings.data.fixtures_dir,
        &settings.tables,
        Duration::ZERO,
    )
    .unwrap();
    AppState::build(Arc::new(store), &settings)
}

#[tokio::test]
async fn test_integration_browse_listings() {
    let state = create_state(0.0);

    let all = state.properties.get_all().await.unwrap();
    assert_eq!(all.len(), 10);
    assert_eq!(all.first().map(|p| p.id), Some(1));
    assert_eq!(all.last().map(|p| p.id), Some(10));

    let featured = state.properties.get_featured().await.unwrap();
    assert_eq!(
        featured.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![1, 2, 4, 5, 8, 10]
    );
}

#[tokio::test]
async fn test_integration_search_by_bedrooms() {
    let state = create_state(0.0);
    let filters = PropertyFilters {
        bedrooms: Some(2),
        ..Default::default()
    };

    let results = state.properties.search(&filters).await.unwrap();
    let ids: Vec<i64> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 3, 4, 5, 6, 7, 8, 9]);
    assert!(results.iter().all(|p| p.bedrooms >= 2));
}

#[tokio::test]
async fn test_integration_search_location_and_types() {
    let state = create_state(0.0);
    let filters = PropertyFilters {
        location: Some("tx".to_string()),
        property_types: vec!["House".to_string(), "Condo".to_string()],
        price_max: Some(700000.0),
        ..Default::default()
    };

    let results = state.properties.search(&filters).await.unwrap();
    let ids: Vec<i64> = results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 7]);
}

#[tokio::test]
async fn test_integration_fixture_shapes_normalize() {
    let state = create_state(0.0);

    let loft = state.properties.get_by_id(1).await.unwrap();
    assert!(loft.coordinates.is_some());
    assert!(!loft.features.is_empty());
    assert!(!loft.images.is_empty());

    let missing = state.properties.get_by_id(404).await.unwrap_err();
    assert_eq!(missing.to_string(), "Property 404 not found");
}

#[tokio::test]
async fn test_integration_update_refreshes_featured() {
    let state = create_state(0.0);
    assert_eq!(state.properties.get_featured().await.unwrap().len(), 6);

    let changes = PropertyChanges {
        featured: Some(false),
        ..Default::default()
    };
    state.properties.update(10, changes).await.unwrap();

    let featured = state.properties.get_featured().await.unwrap();
    assert_eq!(featured.len(), 5);
    assert!(featured.iter().all(|p| p.id != 10));
}

#[tokio::test]
async fn test_integration_compare_limit() {
    let state = create_state(0.0);

    for id in [1, 2, 3, 4] {
        state.compare.add_to_compare("user-1", id).await.unwrap();
    }

    let err = state.compare.add_to_compare("user-1", 5).await.unwrap_err();
    assert!(matches!(err, ServiceError::LimitExceeded { max: 4 }));
    assert_eq!(err.to_string(), "Maximum 4 properties can be compared at once");

    let err = state.compare.add_to_compare("user-1", 2).await.unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyExists(_)));

    let properties = state.compare.get_compare_properties("user-1").await.unwrap();
    assert_eq!(properties.len(), 4);
}

#[tokio::test]
async fn test_integration_compare_remove_and_clear() {
    let state = create_state(0.0);

    // clearing an empty list is not an error
    state.compare.clear_compare("user-2").await.unwrap();

    let err = state.compare.remove_from_compare("user-2", 3).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    state.compare.add_to_compare("user-2", 3).await.unwrap();
    assert!(state.compare.is_in_compare("user-2", 3).await);
    state.compare.clear_compare("user-2").await.unwrap();
    assert!(!state.compare.is_in_compare("user-2", 3).await);
}

#[tokio::test]
async fn test_integration_favorites_idempotent() {
    let state = create_state(0.0);

    let first = state.favorites.create("user-1", 8).await.unwrap();
    let again = state.favorites.create("user-1", 8).await.unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(state.favorites.get_all("user-1").await.unwrap().len(), 1);
    assert!(state.favorites.get_all("user-2").await.unwrap().is_empty());

    state.favorites.delete_by_property_id("user-1", 8).await.unwrap();
    assert!(!state.favorites.is_favorite("user-1", 8).await);
}

#[tokio::test]
async fn test_integration_agent_directory() {
    let state = create_state(0.0);

    let agents = state.agents.get_all().await.unwrap();
    let ratings: Vec<f64> = agents.iter().map(|a| a.rating).collect();
    assert_eq!(ratings, vec![4.9, 4.6, 4.2, 3.8]);

    let lone_star = state
        .agents
        .search(&homescope::models::AgentFilters {
            term: Some("lone star".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(lone_star.len(), 2);

    let specialties = state.agents.get_specialties().await.unwrap();
    assert!(specialties.contains(&"Historic Homes".to_string()));
    assert!(specialties.windows(2).all(|w| w[0] < w[1]));

    let top = state.agents.filter_by_rating(4.5).await.unwrap();
    assert_eq!(top.len(), 2);
}

#[tokio::test]
async fn test_integration_contact_agent() {
    let state = create_state(0.0);

    let outcome = state
        .agents
        .contact_agent(1, "email", Some("Is the loft available?"), None)
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.message, "Email sent successfully to Maya Thompson");

    // Jordan Blake has no phone number on file
    let err = state
        .agents
        .contact_agent(2, "phone", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ContactUnavailable(ContactMethod::Phone)));

    let methods = state.agents.get_contact_methods(3).await.unwrap();
    assert_eq!(methods, vec![ContactMethod::Phone]);
}

#[tokio::test]
async fn test_integration_contact_email_failure() {
    let state = create_state(1.0);
    let err = state
        .agents
        .contact_agent(4, "email", None, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email service temporarily unavailable");
}

#[tokio::test]
async fn test_integration_neighborhood_stats() {
    let state = create_state(0.0);

    let stats = state.neighborhoods.get_by_property_id(4).await.unwrap();
    assert_eq!(stats.bus_routes, vec!["10", "15", "MallRide"]);

    let all = state.neighborhoods.get_all().await.unwrap();
    assert_eq!(all.first().map(|n| n.property_id), Some(2));

    let err = state.neighborhoods.get_by_property_id(7).await.unwrap_err();
    assert_eq!(err.to_string(), "Neighborhood stats not found");
}
