//! Trust Score Engine
//!
//! Score = review component x 0.7 + return component x 0.3, plus a flat
//! verification bonus and a tenure ramp, clamped to [0, 5] and rounded to
//! one decimal (half away from zero). The level is read off the rounded
//! score so a displayed 4.5 is always Platinum.

use tracing::{debug, warn};

use crate::config::LendConfig;
use crate::error::{Error, Result};
use crate::models::trust::{
    Confidence, RatingPolicy, TrustBreakdown, TrustInputs, TrustLevel, TrustScoreResult,
};

/// Prior for users with no reviews or no transactions.
pub const NEW_USER_BASE_SCORE: f64 = 3.0;

pub const REVIEW_WEIGHT: f64 = 0.7;
pub const RETURN_WEIGHT: f64 = 0.3;

/// Reviews needed before the observed rating fully replaces the prior.
pub const MIN_REVIEWS_FOR_CONFIDENCE: u32 = 5;
pub const MIN_TRANSACTIONS_FOR_CONFIDENCE: u64 = 5;
pub const MIN_HISTORY_FOR_MEDIUM: u64 = 2;

pub const VERIFICATION_BONUS: f64 = 0.2;
pub const MAX_TENURE_BONUS: f64 = 0.3;
pub const TENURE_SATURATION_DAYS: f64 = 365.0;

pub const MIN_TRUST_SCORE: f64 = 0.0;
pub const MAX_TRUST_SCORE: f64 = 5.0;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Blend the prior toward the observed rating, saturating at five reviews.
pub fn review_component(average_review_rating: f64, total_reviews: u32) -> f64 {
    if total_reviews == 0 {
        return NEW_USER_BASE_SCORE;
    }
    let confidence_factor =
        (f64::from(total_reviews) / f64::from(MIN_REVIEWS_FOR_CONFIDENCE)).min(1.0);
    NEW_USER_BASE_SCORE * (1.0 - confidence_factor) + average_review_rating * confidence_factor
}

/// Success rate across borrowing and lending, on a 0-5 scale.
pub fn return_component(input: &TrustInputs) -> f64 {
    let total = input.total_transactions();
    if total == 0 {
        return NEW_USER_BASE_SCORE;
    }
    let success_rate = input.successful_transactions() as f64 / total as f64;
    success_rate * 5.0
}

/// Linear ramp to +0.3 at one year.
pub fn tenure_bonus(account_age_days: u32) -> f64 {
    (f64::from(account_age_days) / TENURE_SATURATION_DAYS).min(1.0) * MAX_TENURE_BONUS
}

pub fn confidence_for(total_reviews: u32, total_transactions: u64) -> Confidence {
    if total_reviews >= MIN_REVIEWS_FOR_CONFIDENCE
        && total_transactions >= MIN_TRANSACTIONS_FOR_CONFIDENCE
    {
        Confidence::High
    } else if u64::from(total_reviews) >= MIN_HISTORY_FOR_MEDIUM
        || total_transactions >= MIN_HISTORY_FOR_MEDIUM
    {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Calculate a trust score. Total: ratings outside [0, 5] are clamped and a
/// NaN rating counts as 0.
pub fn calculate_trust_score(input: &TrustInputs) -> TrustScoreResult {
    let rating = clamp_rating(input.average_review_rating);

    let review = review_component(rating, input.total_reviews);
    let returns = return_component(input);
    let verification = if input.is_verified {
        VERIFICATION_BONUS
    } else {
        0.0
    };
    let tenure = tenure_bonus(input.account_age_days);

    let base = review * REVIEW_WEIGHT + returns * RETURN_WEIGHT;
    let score = round_to(
        (base + verification + tenure).clamp(MIN_TRUST_SCORE, MAX_TRUST_SCORE),
        1,
    );

    let result = TrustScoreResult {
        score,
        level: TrustLevel::from_score(score),
        confidence: confidence_for(input.total_reviews, input.total_transactions()),
        breakdown: TrustBreakdown {
            review_component: round_to(review, 1),
            return_component: round_to(returns, 1),
            verification_bonus: verification,
            tenure_bonus: round_to(tenure, 2),
        },
    };

    debug!(
        score = result.score,
        level = result.level.display_name(),
        confidence = ?result.confidence,
        "calculated trust score"
    );

    result
}

fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        MIN_TRUST_SCORE
    } else {
        rating.clamp(MIN_TRUST_SCORE, MAX_TRUST_SCORE)
    }
}

/// Trust engine with an explicit policy for out-of-range ratings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustEngine {
    rating_policy: RatingPolicy,
}

impl TrustEngine {
    pub fn new(rating_policy: RatingPolicy) -> Self {
        Self { rating_policy }
    }

    pub fn from_config(config: &LendConfig) -> Self {
        Self::new(config.rating_policy)
    }

    pub fn rating_policy(&self) -> RatingPolicy {
        self.rating_policy
    }

    /// Score `input` under this engine's policy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-finite rating, and for a rating
    /// outside [0, 5] when the policy is `Reject`.
    pub fn score(&self, input: &TrustInputs) -> Result<TrustScoreResult> {
        let rating = input.average_review_rating;
        if !rating.is_finite() {
            return Err(Error::invalid_input(format!(
                "averageReviewRating must be finite, got {}",
                rating
            )));
        }

        if !(MIN_TRUST_SCORE..=MAX_TRUST_SCORE).contains(&rating) {
            match self.rating_policy {
                RatingPolicy::Reject => {
                    return Err(Error::invalid_input(format!(
                        "averageReviewRating {} outside [0, 5]",
                        rating
                    )))
                }
                RatingPolicy::Clamp => {
                    warn!(rating, "clamping out-of-range review rating");
                }
            }
        }

        if input.successful_returns > input.total_borrowings
            || input.successful_lends > input.total_lendings
        {
            warn!(
                successful = input.successful_transactions(),
                total = input.total_transactions(),
                "successful transactions exceed totals"
            );
        }

        Ok(calculate_trust_score(input))
    }
}
