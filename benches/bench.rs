// Criterion benchmarks for Homescope

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use homescope::core::{apply_filters, build_search_query, matches_location};
use homescope::models::{Property, PropertyFilters};
use serde_json::json;

const CITIES: [&str; 5] = ["Austin", "Denver", "Boulder", "San Antonio", "New Orleans"];
const TYPES: [&str; 4] = ["House", "Condo", "Townhouse", "Apartment"];

fn create_listing(id: usize) -> Property {
    serde_json::from_value(json!({
        "Id": id,
        "title": format!("Listing {}", id),
        "price": 150000 + (id % 40) * 25000,
        "address": format!("{} Elm St", id),
        "city": CITIES[id % CITIES.len()],
        "state": "TX",
        "bedrooms": id % 6,
        "bathrooms": 1.0 + (id % 3) as f64 * 0.5,
        "property_type": TYPES[id % TYPES.len()],
        "features": "Garage,Garden",
    }))
    .unwrap()
}

fn search_filters() -> PropertyFilters {
    PropertyFilters {
        location: Some("austin".to_string()),
        price_min: Some(200000.0),
        price_max: Some(800000.0),
        bedrooms: Some(2),
        bathrooms: Some(1.5),
        property_types: vec!["House".to_string(), "Condo".to_string()],
    }
}

fn bench_location_match(c: &mut Criterion) {
    let listing = create_listing(42);
    c.bench_function("matches_location", |b| {
        b.iter(|| matches_location(black_box(&listing), black_box("san antonio")));
    });
}

fn bench_filter_pipeline(c: &mut Criterion) {
    let filters = search_filters();
    let mut group = c.benchmark_group("apply_filters");

    for listing_count in [10, 100, 1000, 10000].iter() {
        let listings: Vec<Property> = (0..*listing_count).map(create_listing).collect();

        group.bench_with_input(
            BenchmarkId::new("listings", listing_count),
            listing_count,
            |b, _| {
                b.iter(|| apply_filters(black_box(listings.clone()), black_box(&filters)));
            },
        );
    }

    group.finish();
}

fn bench_query_evaluation(c: &mut Criterion) {
    let filters = search_filters();
    let query = build_search_query(&["title", "price", "city", "bedrooms"], &filters);
    let records: Vec<_> = (0..1000)
        .map(|id| serde_json::to_value(create_listing(id)).unwrap())
        .collect();

    c.bench_function("record_query_1000_listings", |b| {
        b.iter(|| {
            let matched: Vec<_> = records.iter().filter(|r| query.matches(r)).collect();
            black_box(matched)
        });
    });
}

criterion_group!(
    benches,
    bench_location_match,
    bench_filter_pipeline,
    bench_query_evaluation
);
criterion_main!(benches);
