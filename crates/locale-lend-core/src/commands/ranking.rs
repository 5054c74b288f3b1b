//! Ranking Commands
//!
//! Nearby and search listings over item documents.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::ranking::{rank_items, RankOptions};
use crate::error::{Error, Result};
use crate::models::geo::GeoPoint;
use crate::models::item::{ItemCategory, ListableItem};
use crate::models::record::RawItemRecord;
use crate::LocaleLend;

/// Query for the nearby listing.
///
/// Missing coordinates fall back to the configured default location and a
/// missing radius to the configured search radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lng: Option<f64>,

    /// Meters
    #[serde(default)]
    pub radius: Option<f64>,

    #[serde(default)]
    pub category: Option<ItemCategory>,
}

impl NearbyQuery {
    pub fn at(location: GeoPoint) -> Self {
        Self {
            lat: Some(location.latitude()),
            lng: Some(location.longitude()),
            ..Default::default()
        }
    }

    pub fn radius(mut self, meters: f64) -> Self {
        self.radius = Some(meters);
        self
    }

    pub fn category(mut self, category: ItemCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// The reference point, if both coordinates were given.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` when only one coordinate is present or
    /// either is out of range.
    pub fn location(&self) -> Result<Option<GeoPoint>> {
        match (self.lng, self.lat) {
            (Some(lng), Some(lat)) => GeoPoint::new(lng, lat).map(Some),
            (None, None) => Ok(None),
            _ => Err(Error::InvalidCoordinates(
                "lat and lng must be given together".into(),
            )),
        }
    }
}

/// Nearby listing with the parameters it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyItems {
    pub items: Vec<ListableItem>,

    /// Number of items returned
    pub total: usize,

    /// Radius in meters
    pub radius: f64,

    pub center: GeoPoint,
}

/// Convert item documents, skipping any that fail validation.
///
/// A single malformed document is logged and left out rather than failing
/// the whole listing.
pub fn listable_items(records: &[RawItemRecord]) -> Vec<ListableItem> {
    records
        .iter()
        .filter_map(|record| match record.to_listable_item() {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(
                    item = record.id.as_deref().unwrap_or("<unknown>"),
                    error = %e,
                    "skipping invalid item record"
                );
                None
            }
        })
        .collect()
}

/// Available items within the search radius, nearest first, one page.
pub fn rank_nearby(
    state: &LocaleLend,
    records: &[RawItemRecord],
    query: &NearbyQuery,
) -> Result<NearbyItems> {
    let config = state.config();
    let center = config.reference_point_or_default(query.location()?);
    let radius = query.radius.unwrap_or(config.search_radius_meters);
    validate_radius(radius)?;

    let mut options = RankOptions::nearby(config).within(radius);
    options.category = query.category;

    let items = rank_items(&listable_items(records), &center, &options);
    debug!(total = items.len(), radius, "nearby listing");

    Ok(NearbyItems {
        total: items.len(),
        items,
        radius,
        center,
    })
}

/// Search listing around `location` (or the default location).
///
/// `options` defaults to [`RankOptions::search`] for the configuration.
pub fn search_items(
    state: &LocaleLend,
    records: &[RawItemRecord],
    location: Option<GeoPoint>,
    options: Option<RankOptions>,
) -> Result<Vec<ListableItem>> {
    let config = state.config();
    let options = options.unwrap_or_else(|| RankOptions::search(config));
    if let Some(max) = options.max_distance_meters {
        validate_radius(max)?;
    }

    let reference = config.reference_point_or_default(location);
    Ok(rank_items(&listable_items(records), &reference, &options))
}

fn validate_radius(meters: f64) -> Result<()> {
    if !meters.is_finite() || meters < 0.0 {
        return Err(Error::invalid_input(format!(
            "radius must be a non-negative number of meters, got {}",
            meters
        )));
    }
    Ok(())
}
