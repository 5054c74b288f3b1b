//! Item Models
//!
//! The slice of a listing the ranking pipeline reads. The document store
//! owns the full record; these values are copies annotated with a distance.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::geo::GeoPoint;

/// Listing categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Tools,
    Electronics,
    Kitchen,
    Outdoor,
    Books,
    Sports,
}

impl ItemCategory {
    /// Every category, in display order.
    pub const ALL: [ItemCategory; 6] = [
        ItemCategory::Tools,
        ItemCategory::Electronics,
        ItemCategory::Kitchen,
        ItemCategory::Outdoor,
        ItemCategory::Books,
        ItemCategory::Sports,
    ];

    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemCategory::Tools => "Tools",
            ItemCategory::Electronics => "Electronics",
            ItemCategory::Kitchen => "Kitchen",
            ItemCategory::Outdoor => "Outdoor",
            ItemCategory::Books => "Books",
            ItemCategory::Sports => "Sports",
        }
    }

    /// Get the icon name (for UI)
    pub fn icon(&self) -> &'static str {
        match self {
            ItemCategory::Tools => "Wrench",
            ItemCategory::Electronics => "Laptop",
            ItemCategory::Kitchen => "ChefHat",
            ItemCategory::Outdoor => "Tent",
            ItemCategory::Books => "BookOpen",
            ItemCategory::Sports => "Bike",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ItemCategory {
    type Err = Error;

    /// Case-insensitive; the store has held both `Tools` and `tools`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ItemCategory::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::invalid_record(format!("unknown category '{}'", s)))
    }
}

/// Lending status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Can be requested right now
    #[default]
    Available,
    /// Currently out on loan
    Lended,
    /// Withdrawn by the owner
    Unavailable,
}

impl ItemStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ItemStatus::Available)
    }
}

impl FromStr for ItemStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(ItemStatus::Available),
            "lended" => Ok(ItemStatus::Lended),
            "unavailable" => Ok(ItemStatus::Unavailable),
            other => Err(Error::invalid_record(format!("unknown status '{}'", other))),
        }
    }
}

/// A listing as seen by the ranking pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListableItem {
    /// Document id in the store
    pub id: String,

    /// Listing title (display only)
    #[serde(default)]
    pub title: String,

    /// Owner's user id (display only)
    #[serde(default)]
    pub owner_id: String,

    /// Pickup location, if the owner shared one
    #[serde(default)]
    pub location: Option<GeoPoint>,

    pub category: ItemCategory,

    #[serde(default)]
    pub status: ItemStatus,

    pub created_at: DateTime<Utc>,

    /// Completed loans of this item
    #[serde(default)]
    pub borrow_count: u32,

    /// Whole meters from the reference point; set by the ranking pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

/// Ordering applied after the availability split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Nearest first
    Distance,
    /// Most recently listed first
    #[default]
    Newest,
    /// Most borrowed first
    Popular,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" | "nearest" => Ok(SortKey::Distance),
            "newest" => Ok(SortKey::Newest),
            "popular" => Ok(SortKey::Popular),
            other => Err(Error::invalid_input(format!("unknown sort key '{}'", other))),
        }
    }
}

/// What to do with listings that carry no location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnlocatedPolicy {
    /// Treat as zero meters away (they rank as nearest)
    #[default]
    ZeroDistance,
    /// Drop them from the result
    Exclude,
}
