//! Trust Score Commands
//!
//! Score user documents under the configured rating policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::record::RawUserRecord;
use crate::models::trust::{format_trust_score, trust_color_class, TrustLevel, TrustScoreResult};
use crate::LocaleLend;

/// Score a user document as of `now`.
///
/// The caller persists `score` back to the user document.
///
/// # Errors
///
/// - `InvalidInput` for negative or fractional counters, or a rating the
///   configured policy rejects
/// - `InvalidRecord` when reviews exist but no rating does
pub fn score_user(
    state: &LocaleLend,
    record: &RawUserRecord,
    now: DateTime<Utc>,
) -> Result<TrustScoreResult> {
    let inputs = record.to_trust_inputs(now)?;
    let result = state.trust_engine().score(&inputs)?;

    debug!(
        user = record.id.as_deref().unwrap_or("<unknown>"),
        score = result.score,
        "scored user"
    );

    Ok(result)
}

/// Parse a user document from JSON and score it.
pub fn score_user_json(state: &LocaleLend, json: &str, now: DateTime<Utc>) -> Result<TrustScoreResult> {
    let record = RawUserRecord::from_json(json)?;
    score_user(state, &record, now)
}

/// What a listing card shows next to an owner's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustBadge {
    /// Score with one decimal, e.g. `"4.6"`
    pub label: String,

    pub level: TrustLevel,

    pub level_name: String,

    /// CSS class tinting the badge
    pub color_class: String,
}

impl From<&TrustScoreResult> for TrustBadge {
    fn from(result: &TrustScoreResult) -> Self {
        Self {
            label: format_trust_score(result.score),
            level: result.level,
            level_name: result.level.display_name().to_string(),
            color_class: trust_color_class(result.score).to_string(),
        }
    }
}

/// Score a user document and render its badge.
pub fn trust_badge(state: &LocaleLend, record: &RawUserRecord, now: DateTime<Utc>) -> Result<TrustBadge> {
    score_user(state, record, now).map(|result| TrustBadge::from(&result))
}
