//! Locale Lend Configuration
//!
//! Configuration options for the marketplace core, loadable from a JSON file
//! or set programmatically via [`LocaleLendBuilder`](crate::LocaleLendBuilder).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::geo::GeoPoint;
use crate::models::item::{SortKey, UnlocatedPolicy};
use crate::models::trust::RatingPolicy;

/// Locale Lend Configuration
///
/// # Configuration file
///
/// ```json
/// {
///   "defaultLocation": { "type": "Point", "coordinates": [80.4365, 16.3067] },
///   "searchRadiusMeters": 2000,
///   "pageSize": 12,
///   "ratingPolicy": "clamp",
///   "otpTtlSeconds": 300
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LendConfig {
    /// Reference point used when the device location is unavailable.
    ///
    /// Default: Guntur, `[80.4365, 16.3067]`
    #[serde(default)]
    pub default_location: GeoPoint,

    /// Radius of the "nearby" listing in meters.
    ///
    /// Default: `2000`
    #[serde(default = "default_search_radius")]
    pub search_radius_meters: f64,

    /// Sort key for search listings when the caller gives none.
    ///
    /// Default: `newest`
    #[serde(default)]
    pub default_sort_key: SortKey,

    /// Items per listing page.
    ///
    /// Default: `12`
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// What the trust engine does with ratings outside [0, 5].
    ///
    /// Default: `clamp`
    #[serde(default)]
    pub rating_policy: RatingPolicy,

    /// What the ranking pipeline does with items lacking a location.
    ///
    /// Default: `zeroDistance`
    #[serde(default)]
    pub unlocated_policy: UnlocatedPolicy,

    /// Lifetime of a one-time verification code in seconds.
    ///
    /// Default: `300` (5 minutes)
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_seconds: u64,

    /// Enable debug logging.
    ///
    /// Default: `false`
    #[serde(default)]
    pub debug: bool,
}

fn default_search_radius() -> f64 {
    2000.0
}

fn default_page_size() -> usize {
    12
}

fn default_otp_ttl() -> u64 {
    300 // 5 minutes
}

impl Default for LendConfig {
    fn default() -> Self {
        Self {
            default_location: GeoPoint::GUNTUR,
            search_radius_meters: default_search_radius(),
            default_sort_key: SortKey::default(),
            page_size: default_page_size(),
            rating_policy: RatingPolicy::default(),
            unlocated_policy: UnlocatedPolicy::default(),
            otp_ttl_seconds: default_otp_ttl(),
            debug: false,
        }
    }
}

impl LendConfig {
    /// Create a configuration for development/testing.
    ///
    /// Enables debug logging; everything else stays lenient.
    pub fn development() -> Self {
        Self {
            debug: true,
            ..Default::default()
        }
    }

    /// Create a configuration for production.
    ///
    /// Out-of-range ratings are rejected and unlocated items are left out
    /// of listings.
    pub fn production() -> Self {
        Self {
            rating_policy: RatingPolicy::Reject,
            unlocated_policy: UnlocatedPolicy::Exclude,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON configuration. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LendConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.search_radius_meters.is_finite() || self.search_radius_meters <= 0.0 {
            return Err(Error::Config(format!(
                "searchRadiusMeters must be positive, got {}",
                self.search_radius_meters
            )));
        }
        if self.page_size == 0 {
            return Err(Error::Config("pageSize must be at least 1".into()));
        }
        if self.otp_ttl_seconds == 0 {
            return Err(Error::Config("otpTtlSeconds must be at least 1".into()));
        }
        if ttl_from_seconds(self.otp_ttl_seconds).is_none() {
            return Err(Error::Config(format!(
                "otpTtlSeconds {} is too large",
                self.otp_ttl_seconds
            )));
        }
        Ok(())
    }

    /// The caller's location, or the configured fallback.
    pub fn reference_point_or_default(&self, location: Option<GeoPoint>) -> GeoPoint {
        location.unwrap_or(self.default_location)
    }

    /// One-time code lifetime.
    pub fn otp_ttl(&self) -> chrono::Duration {
        ttl_from_seconds(self.otp_ttl_seconds)
            .unwrap_or_else(|| chrono::Duration::seconds(default_otp_ttl() as i64))
    }
}

fn ttl_from_seconds(seconds: u64) -> Option<chrono::Duration> {
    i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
}
