//! Email Verification Commands
//!
//! Issue a one-time code for an email address and check it later. Sending
//! the code is the mail transport's job.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::LocaleLend;

/// A code ready to be mailed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCode {
    pub email: String,
    pub code: String,
    /// Seconds until the code expires
    pub expires_in_seconds: i64,
}

/// Issue a fresh code for `email`, replacing any pending one.
pub fn request_code(state: &LocaleLend, email: &str) -> Result<IssuedCode> {
    let code = state.codes().issue(email)?;
    Ok(IssuedCode {
        email: email.trim().to_ascii_lowercase(),
        code,
        expires_in_seconds: state.config().otp_ttl().num_seconds(),
    })
}

/// Check a submitted code. A match consumes it.
///
/// `CodeNotFound`, `CodeExpired` and `CodeMismatch` are recoverable: the
/// caller can ask for a new code or try again.
pub fn verify_code(state: &LocaleLend, email: &str, code: &str) -> Result<()> {
    state.codes().verify(email, code)
}

/// Drop expired codes. Returns how many were removed.
pub fn purge_expired_codes(state: &LocaleLend) -> Result<usize> {
    state.codes().purge_expired()
}
