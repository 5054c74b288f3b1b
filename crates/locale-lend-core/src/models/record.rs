//! Document Store Records
//!
//! Loosely typed shapes of user and item documents as they arrive from the
//! document store. Numeric fields may be numbers, numeric strings or null;
//! timestamps may be RFC 3339 strings, epoch milliseconds or the store's
//! `{seconds, nanoseconds}` object. Converting a record is the only path into
//! [`TrustInputs`] and [`ListableItem`], so malformed data stops here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::geo::GeoPoint;
use crate::models::item::{ItemCategory, ItemStatus, ListableItem};
use crate::models::trust::TrustInputs;

/// A user document, reduced to the fields trust scoring needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub average_review_rating: Option<Value>,

    #[serde(default)]
    pub total_reviews: Option<Value>,

    #[serde(default)]
    pub successful_returns: Option<Value>,

    #[serde(default)]
    pub total_borrowings: Option<Value>,

    #[serde(default)]
    pub successful_lends: Option<Value>,

    #[serde(default)]
    pub total_lendings: Option<Value>,

    #[serde(default, alias = "isVerified")]
    pub verified: Option<bool>,

    /// Account creation time; used when `accountAgeDays` is absent
    #[serde(default)]
    pub member_since: Option<Value>,

    #[serde(default)]
    pub account_age_days: Option<Value>,
}

impl RawUserRecord {
    /// Parse a user document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the record and build trust inputs as of `now`.
    ///
    /// Missing counters count as zero. A rating is required once the user
    /// has reviews. Out-of-range ratings pass through; the engine's rating
    /// policy decides what happens to them.
    pub fn to_trust_inputs(&self, now: DateTime<Utc>) -> Result<TrustInputs> {
        let total_reviews = count_field("totalReviews", self.total_reviews.as_ref())?;

        let average_review_rating =
            match number_field("averageReviewRating", self.average_review_rating.as_ref())? {
                Some(rating) => rating,
                None if total_reviews > 0 => {
                    return Err(Error::invalid_record(format!(
                        "averageReviewRating missing with {} reviews",
                        total_reviews
                    )))
                }
                None => 0.0,
            };

        let account_age_days = match count_field_opt("accountAgeDays", self.account_age_days.as_ref())? {
            Some(days) => days,
            None => match timestamp_field("memberSince", self.member_since.as_ref())? {
                Some(since) => age_in_days(since, now),
                None => 0,
            },
        };

        Ok(TrustInputs {
            average_review_rating,
            total_reviews,
            successful_returns: count_field("successfulReturns", self.successful_returns.as_ref())?,
            total_borrowings: count_field("totalBorrowings", self.total_borrowings.as_ref())?,
            successful_lends: count_field("successfulLends", self.successful_lends.as_ref())?,
            total_lendings: count_field("totalLendings", self.total_lendings.as_ref())?,
            is_verified: self.verified.unwrap_or(false),
            account_age_days,
        })
    }
}

/// An item document, reduced to the fields ranking needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItemRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub owner_id: Option<String>,

    /// GeoJSON point
    #[serde(default)]
    pub location: Option<Value>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<Value>,

    #[serde(default)]
    pub borrow_count: Option<Value>,
}

impl RawItemRecord {
    /// Parse an item document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse an array of item documents from JSON.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the record and build a listable item.
    ///
    /// `id`, `category` and `createdAt` are required. A missing status is
    /// read as `available` and a missing borrow count as zero. A null
    /// location is kept as absent; a malformed one is an error.
    pub fn to_listable_item(&self) -> Result<ListableItem> {
        let id = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::invalid_record("item id missing"))?
            .to_string();

        let category: ItemCategory = self
            .category
            .as_deref()
            .ok_or_else(|| Error::invalid_record(format!("item {} has no category", id)))?
            .parse()?;

        let status = match self.status.as_deref() {
            Some(status) => status.parse()?,
            None => ItemStatus::Available,
        };

        let created_at = timestamp_field("createdAt", self.created_at.as_ref())?
            .ok_or_else(|| Error::invalid_record(format!("item {} has no createdAt", id)))?;

        Ok(ListableItem {
            title: self.title.clone().unwrap_or_default(),
            owner_id: self.owner_id.clone().unwrap_or_default(),
            location: location_field(self.location.as_ref())?,
            category,
            status,
            created_at,
            borrow_count: count_field("borrowCount", self.borrow_count.as_ref())?,
            distance_meters: None,
            id,
        })
    }
}

fn age_in_days(since: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - since).num_days();
    if days < 0 {
        tracing::warn!(%since, %now, "memberSince is in the future, using zero account age");
        return 0;
    }
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Read a finite number, accepting numeric strings. `None` when absent or null.
fn number_field(name: &str, value: Option<&Value>) -> Result<Option<f64>> {
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(Error::invalid_record(format!(
                "{} must be a number, got {}",
                name, other
            )))
        }
    };

    match number {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(Error::invalid_input(format!("{} is not a finite number", name))),
    }
}

fn count_field_opt(name: &str, value: Option<&Value>) -> Result<Option<u32>> {
    let Some(number) = number_field(name, value)? else {
        return Ok(None);
    };
    if number < 0.0 {
        return Err(Error::invalid_input(format!("{} cannot be negative: {}", name, number)));
    }
    if number.fract() != 0.0 {
        return Err(Error::invalid_input(format!("{} must be a whole number: {}", name, number)));
    }
    if number > f64::from(u32::MAX) {
        return Err(Error::invalid_input(format!("{} is too large: {}", name, number)));
    }
    Ok(Some(number as u32))
}

fn count_field(name: &str, value: Option<&Value>) -> Result<u32> {
    Ok(count_field_opt(name, value)?.unwrap_or(0))
}

fn timestamp_field(name: &str, value: Option<&Value>) -> Result<Option<DateTime<Utc>>> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Some(Value::Object(map)) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64);
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            match (seconds, u32::try_from(nanos)) {
                (Some(secs), Ok(nanos)) => DateTime::from_timestamp(secs, nanos),
                _ => None,
            }
        }
        Some(_) => None,
    };

    parsed
        .map(Some)
        .ok_or_else(|| Error::invalid_record(format!("{} is not a valid timestamp", name)))
}

fn location_field(value: Option<&Value>) -> Result<Option<GeoPoint>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }

    let coordinates = value
        .get("coordinates")
        .and_then(Value::as_array)
        .filter(|c| c.len() == 2)
        .ok_or_else(|| Error::invalid_record("location must be a GeoJSON point"))?;

    let axis = |index: usize, label: &str| -> Result<f64> {
        coordinates
            .get(index)
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::InvalidCoordinates(format!("{} is not a number", label)))
    };

    GeoPoint::new(axis(0, "longitude")?, axis(1, "latitude")?).map(Some)
}
