//! Trust Models
//!
//! Reputation inputs and results. A trust score is rebuilt from the
//! caller's aggregates on every change; nothing here is persisted by the core.

use serde::{Deserialize, Serialize};

/// Aggregates the trust engine scores.
///
/// Counters are unsigned; negative values from the store are rejected at
/// the record boundary before they get here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustInputs {
    /// Mean peer rating on a 0-5 scale
    pub average_review_rating: f64,

    /// Number of reviews received
    pub total_reviews: u32,

    /// Borrowed items returned on time
    pub successful_returns: u32,

    /// Borrowing transactions
    pub total_borrowings: u32,

    /// Lends that completed without dispute
    pub successful_lends: u32,

    /// Lending transactions
    pub total_lendings: u32,

    /// Email/phone/ID verified
    pub is_verified: bool,

    /// Days since the account was created
    pub account_age_days: u32,
}

impl TrustInputs {
    /// Borrowings plus lendings.
    pub fn total_transactions(&self) -> u64 {
        u64::from(self.total_borrowings) + u64::from(self.total_lendings)
    }

    /// Successful returns plus successful lends.
    pub fn successful_transactions(&self) -> u64 {
        u64::from(self.successful_returns) + u64::from(self.successful_lends)
    }
}

/// Trust level derived from the rounded score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrustLevel {
    /// Below 2.5
    New,
    /// 2.5 to 3.4
    Bronze,
    /// 3.5 to 3.9
    Silver,
    /// 4.0 to 4.4
    Gold,
    /// 4.5 and above
    Platinum,
}

impl TrustLevel {
    /// Get the level from a rounded score
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            TrustLevel::Platinum
        } else if score >= 4.0 {
            TrustLevel::Gold
        } else if score >= 3.5 {
            TrustLevel::Silver
        } else if score >= 2.5 {
            TrustLevel::Bronze
        } else {
            TrustLevel::New
        }
    }

    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TrustLevel::New => "New",
            TrustLevel::Bronze => "Bronze",
            TrustLevel::Silver => "Silver",
            TrustLevel::Gold => "Gold",
            TrustLevel::Platinum => "Platinum",
        }
    }

    /// Minimum score for this level
    pub fn min_score(&self) -> f64 {
        match self {
            TrustLevel::New => 0.0,
            TrustLevel::Bronze => 2.5,
            TrustLevel::Silver => 3.5,
            TrustLevel::Gold => 4.0,
            TrustLevel::Platinum => 4.5,
        }
    }
}

/// How much history backs a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Intermediate values, kept for auditing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustBreakdown {
    /// Review blend, rounded to 1 decimal
    pub review_component: f64,

    /// Success-rate component, rounded to 1 decimal
    pub return_component: f64,

    /// 0.2 when verified
    pub verification_bonus: f64,

    /// Tenure ramp, rounded to 2 decimals
    pub tenure_bonus: f64,
}

/// Trust score for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScoreResult {
    /// Final score in [0, 5], one decimal
    pub score: f64,

    pub level: TrustLevel,

    pub confidence: Confidence,

    pub breakdown: TrustBreakdown,
}

/// How the engine treats ratings outside `[0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingPolicy {
    /// Pull the rating into range
    #[default]
    Clamp,
    /// Fail with `InvalidInput`
    Reject,
}

/// CSS class used to tint a score badge.
pub fn trust_color_class(score: f64) -> &'static str {
    if score >= 4.0 {
        "trust-high"
    } else if score >= 2.5 {
        "trust-medium"
    } else {
        "text-muted-foreground"
    }
}

/// Format a score for display with exactly one decimal.
pub fn format_trust_score(score: f64) -> String {
    format!("{:.1}", score)
}
