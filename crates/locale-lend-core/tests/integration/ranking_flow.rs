//! Integration Tests: Proximity Ranking Flow
//!
//! Item documents in, listings out:
//! - Nearby listing with the default radius and fallback location
//! - Availability ahead of distance
//! - Search listings under each sort key
//! - Title search
//! - Unlocated items under both policies

use chrono::{TimeZone, Utc};
use locale_lend_core::commands::ranking::{rank_nearby, search_items, NearbyQuery};
use locale_lend_core::models::{
    GeoPoint, ItemCategory, ItemStatus, ListableItem, RawItemRecord, SortKey,
};
use locale_lend_core::{format_distance, rank_items, LendConfig, LocaleLend, LocaleLendBuilder, RankOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Six listings around Guntur, in the shapes the document store returns.
const LISTINGS: &str = r#"[
    {
        "id": "drill", "title": "Cordless Drill", "ownerId": "u1",
        "location": { "type": "Point", "coordinates": [80.4365, 16.3077] },
        "category": "Tools", "status": "available",
        "createdAt": "2025-01-05T00:00:00Z", "borrowCount": 4
    },
    {
        "id": "tent", "title": "Two-person Tent", "ownerId": "u2",
        "location": { "type": "Point", "coordinates": [80.4365, 16.3069] },
        "category": "Outdoor", "status": "lended",
        "createdAt": { "_seconds": 1736467200, "_nanoseconds": 0 }, "borrowCount": 10
    },
    {
        "id": "blender", "title": "Blender", "ownerId": "u3",
        "location": { "type": "Point", "coordinates": [80.4365, 16.3167] },
        "category": "kitchen",
        "createdAt": "2025-01-08T00:00:00Z", "borrowCount": "7"
    },
    {
        "id": "novel", "title": "Paperback Novel", "ownerId": "u1",
        "location": { "type": "Point", "coordinates": [80.4365, 16.3117] },
        "category": "Books", "status": "unavailable",
        "createdAt": "2025-01-02T00:00:00Z", "borrowCount": 2
    },
    {
        "id": "bike", "title": "Road Bike", "ownerId": "u4",
        "location": { "type": "Point", "coordinates": [80.4365, 16.3367] },
        "category": "Sports", "status": "available",
        "createdAt": "2025-01-12T00:00:00Z", "borrowCount": 9
    },
    {
        "id": "ghost", "title": "Projector", "ownerId": "u5",
        "location": null,
        "category": "Electronics", "status": "available",
        "createdAt": 1735862400000, "borrowCount": 5
    }
]"#;

fn records() -> Vec<RawItemRecord> {
    RawItemRecord::list_from_json(LISTINGS).expect("listings parse")
}

fn lend() -> LocaleLend {
    LocaleLendBuilder::new().build().expect("default config is valid")
}

fn ids(items: &[ListableItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

/// Test: default nearby listing around the fallback location
#[test]
fn test_nearby_listing() {
    let nearby = rank_nearby(&lend(), &records(), &NearbyQuery::default()).unwrap();

    // The bike is ~3.3 km out; available items lead, nearest first.
    assert_eq!(ids(&nearby.items), vec!["ghost", "drill", "blender", "tent", "novel"]);
    assert_eq!(nearby.total, 5);
    assert_eq!(nearby.radius, 2000.0);
    assert_eq!(nearby.center, GeoPoint::GUNTUR);

    let drill = &nearby.items[1];
    assert_eq!(drill.distance_meters, Some(111.0));
    assert_eq!(format_distance(drill.distance_meters), "111m away");
    assert_eq!(format_distance(nearby.items[0].distance_meters), "Nearby");
    assert_eq!(drill.title, "Cordless Drill");
    assert_eq!(drill.owner_id, "u1");
}

/// Test: the nearby response serializes with a GeoJSON center
#[test]
fn test_nearby_response_json() {
    let nearby = rank_nearby(&lend(), &records(), &NearbyQuery::default()).unwrap();
    let value = serde_json::to_value(&nearby).unwrap();

    assert_eq!(value["center"], json!({ "type": "Point", "coordinates": [80.4365, 16.3067] }));
    assert_eq!(value["total"], json!(5));
    assert_eq!(value["items"][1]["distanceMeters"], json!(111.0));
    assert_eq!(value["items"][1]["status"], json!("available"));
}

/// Test: a lended item never outranks an available one, however close
#[test]
fn test_available_first_despite_distance() {
    let query = NearbyQuery::default().radius(600.0);
    let nearby = rank_nearby(&lend(), &records(), &query).unwrap();

    assert_eq!(ids(&nearby.items), vec!["ghost", "drill", "tent", "novel"]);
    assert!(nearby.items[2].distance_meters < nearby.items[1].distance_meters);
}

/// Test: category filter on the nearby listing
#[test]
fn test_nearby_category() {
    let query = NearbyQuery::at(GeoPoint::GUNTUR).category(ItemCategory::Books);
    let nearby = rank_nearby(&lend(), &records(), &query).unwrap();
    assert_eq!(ids(&nearby.items), vec!["novel"]);
}

/// Test: production config leaves unlocated items out
#[test]
fn test_unlocated_excluded_in_production() {
    let lend = LocaleLend::new(LendConfig::production()).unwrap();
    let nearby = rank_nearby(&lend, &records(), &NearbyQuery::default()).unwrap();
    assert_eq!(ids(&nearby.items), vec!["drill", "blender", "tent", "novel"]);
}

/// Test: search listing by popularity
#[test]
fn test_search_popular() {
    let options = RankOptions::new(SortKey::Popular);
    let items = search_items(&lend(), &records(), None, Some(options)).unwrap();
    assert_eq!(ids(&items), vec!["bike", "blender", "ghost", "drill", "tent", "novel"]);
}

/// Test: default search listing is newest first
#[test]
fn test_search_newest_by_default() {
    let items = search_items(&lend(), &records(), None, None).unwrap();
    assert_eq!(ids(&items), vec!["bike", "blender", "drill", "ghost", "tent", "novel"]);
}

/// Test: title search keeps matching titles in ranked order
#[test]
fn test_search_by_title() {
    let lend = lend();
    let options = RankOptions::search(lend.config()).title_prefix("P");
    let items = search_items(&lend, &records(), None, Some(options)).unwrap();
    assert_eq!(ids(&items), vec!["ghost", "novel"]);

    // Matching is case-sensitive, as in the document store's range query.
    let options = RankOptions::search(lend.config()).title_prefix("p");
    assert!(search_items(&lend, &records(), None, Some(options)).unwrap().is_empty());
}

/// Test: borrow counts [2, 10, 5] sort to [10, 5, 2]
#[test]
fn test_popular_sort_of_borrow_counts() {
    let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let items: Vec<ListableItem> = [2u32, 10, 5]
        .into_iter()
        .map(|borrow_count| ListableItem {
            id: format!("item-{}", borrow_count),
            title: String::new(),
            owner_id: String::new(),
            location: Some(GeoPoint::GUNTUR),
            category: ItemCategory::Tools,
            status: ItemStatus::Available,
            created_at,
            borrow_count,
            distance_meters: None,
        })
        .collect();

    let ranked = rank_items(&items, &GeoPoint::GUNTUR, &RankOptions::new(SortKey::Popular));
    let counts: Vec<u32> = ranked.iter().map(|item| item.borrow_count).collect();
    assert_eq!(counts, vec![10, 5, 2]);
}

/// Test: distance is symmetric and zero to itself
#[test]
fn test_distance_properties() {
    let north = GeoPoint::new(80.4365, 16.3167).unwrap();
    let d = GeoPoint::GUNTUR.distance_to(&north);

    assert_eq!(GeoPoint::GUNTUR.distance_to(&GeoPoint::GUNTUR), 0.0);
    assert_eq!(d, north.distance_to(&GeoPoint::GUNTUR));
    assert!((d - 1100.0).abs() <= 50.0, "got {}", d);
}

/// Test: malformed coordinates in the query are rejected
#[test]
fn test_query_out_of_range() {
    let query = NearbyQuery {
        lat: Some(95.0),
        lng: Some(80.0),
        ..Default::default()
    };
    assert!(rank_nearby(&lend(), &records(), &query).is_err());
}
