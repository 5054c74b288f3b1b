//! # Locale Lend Core
//!
//! **Trust and proximity for a neighborhood lending marketplace**
//!
//! Neighbors list household items, browse what is available nearby and
//! borrow from each other. This crate holds the two pieces of that system
//! that decide what a borrower sees and whom they can rely on:
//!
//! - **Trust Score Engine**: a 0-5 reputation score from review history,
//!   return/lend success, verification and account age, with a trust level
//!   and a confidence band.
//! - **Proximity Ranking Pipeline**: haversine distance from the borrower,
//!   radius and category filters, then an availability-first stable sort by
//!   distance, recency or popularity.
//!
//! Around them sit a validating record boundary for document-store JSON, a
//! one-time code ledger for email verification, configuration and logging.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use locale_lend_core::{LocaleLendBuilder, RawItemRecord, RawUserRecord};
//! use locale_lend_core::commands::{ranking, trust};
//! use locale_lend_core::commands::ranking::NearbyQuery;
//!
//! # fn main() -> locale_lend_core::Result<()> {
//! let lend = LocaleLendBuilder::new().search_radius(3000.0).build()?;
//!
//! let user = RawUserRecord::from_json(r#"{ "averageReviewRating": 4.8, "totalReviews": 12 }"#)?;
//! let score = trust::score_user(&lend, &user, chrono::Utc::now())?;
//! println!("{} ({})", score.score, score.level.display_name());
//!
//! let items = RawItemRecord::list_from_json("[]")?;
//! let nearby = ranking::rank_nearby(&lend, &items, &NearbyQuery::default())?;
//! println!("{} items within {} m", nearby.total, nearby.radius);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;

pub use config::LendConfig;
pub use error::{Error, Result};
pub use models::*;

pub use crate::core::{
    Clock, ExpiringStore, Lookup, ManualClock, OneTimeCodes, RankOptions, SystemClock, Take,
    TrustEngine,
};
pub use crate::core::ranking::{format_distance, rank_items};
pub use crate::core::trust::calculate_trust_score;

/// Locale Lend State
///
/// Holds the validated configuration, the trust engine configured with its
/// rating policy, and the pending one-time codes.
///
/// # Thread Safety
///
/// Scoring and ranking are pure. The code ledger guards itself with a
/// mutex, so the state can be shared behind an `Arc`.
pub struct LocaleLend {
    config: LendConfig,
    trust: TrustEngine,
    codes: OneTimeCodes,
    clock: Arc<dyn Clock>,
}

impl LocaleLend {
    /// Create state from `config` using wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the configuration fails validation.
    pub fn new(config: LendConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create state with an injected clock for code expiry.
    pub fn with_clock(config: LendConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let trust = TrustEngine::from_config(&config);
        let codes = OneTimeCodes::from_config(&config, clock.clone());

        info!(
            radius = config.search_radius_meters,
            page_size = config.page_size,
            rating_policy = ?config.rating_policy,
            unlocated_policy = ?config.unlocated_policy,
            "locale lend core initialized"
        );

        Ok(Self {
            config,
            trust,
            codes,
            clock,
        })
    }

    pub fn config(&self) -> &LendConfig {
        &self.config
    }

    pub fn trust_engine(&self) -> &TrustEngine {
        &self.trust
    }

    pub fn codes(&self) -> &OneTimeCodes {
        &self.codes
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

/// Builder for a customized [`LocaleLend`].
///
/// # Example
///
/// ```rust,no_run
/// use locale_lend_core::{LocaleLendBuilder, RatingPolicy};
///
/// let lend = LocaleLendBuilder::new()
///     .search_radius(5000.0)
///     .page_size(24)
///     .rating_policy(RatingPolicy::Reject)
///     .build()
///     .expect("valid configuration");
/// ```
pub struct LocaleLendBuilder {
    config: LendConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl LocaleLendBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: LendConfig::default(),
            clock: None,
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: LendConfig) -> Self {
        Self {
            config,
            clock: None,
        }
    }

    /// Fallback reference point when the device location is unavailable.
    pub fn default_location(mut self, location: GeoPoint) -> Self {
        self.config.default_location = location;
        self
    }

    /// Radius of the nearby listing in meters.
    pub fn search_radius(mut self, meters: f64) -> Self {
        self.config.search_radius_meters = meters;
        self
    }

    pub fn default_sort_key(mut self, key: SortKey) -> Self {
        self.config.default_sort_key = key;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size;
        self
    }

    /// How the trust engine treats ratings outside [0, 5].
    pub fn rating_policy(mut self, policy: RatingPolicy) -> Self {
        self.config.rating_policy = policy;
        self
    }

    /// How ranking treats items with no location.
    pub fn unlocated_policy(mut self, policy: UnlocatedPolicy) -> Self {
        self.config.unlocated_policy = policy;
        self
    }

    /// Lifetime of one-time codes.
    pub fn otp_ttl(mut self, ttl: Duration) -> Self {
        self.config.otp_ttl_seconds = ttl.num_seconds().max(0) as u64;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Clock used for code expiry. Defaults to wall-clock time.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and build the state.
    pub fn build(self) -> Result<LocaleLend> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        LocaleLend::with_clock(self.config, clock)
    }
}

impl Default for LocaleLendBuilder {
    fn default() -> Self {
        Self::new()
    }
}
