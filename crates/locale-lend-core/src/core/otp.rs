//! One-Time Codes
//!
//! Six-digit verification codes keyed by email, held in an
//! [`ExpiringStore`]. Delivery is the mail transport's job; this module only
//! issues and checks codes.

use std::sync::Arc;

use chrono::Duration;
use rand::Rng;
use tracing::{info, warn};

use crate::config::LendConfig;
use crate::core::expiring::{Clock, ExpiringStore, Take};
use crate::error::{Error, Result};

/// Number of digits in a code.
pub const CODE_LENGTH: usize = 6;

/// Pending verification codes.
pub struct OneTimeCodes {
    store: ExpiringStore<String, String>,
}

impl OneTimeCodes {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: ExpiringStore::new(ttl, clock),
        }
    }

    pub fn from_config(config: &LendConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.otp_ttl(), clock)
    }

    /// Issue a fresh code for `email`, replacing any pending one.
    ///
    /// Codes left behind by abandoned sign-ups are purged on each issue.
    /// The caller hands the returned code to the mail transport.
    pub fn issue(&self, email: &str) -> Result<String> {
        let key = normalize_email(email)?;
        self.store.purge_expired()?;
        let code = rand::rng().random_range(100_000..1_000_000u32).to_string();
        let expires_at = self.store.insert(key.clone(), code.clone())?;
        info!(email = %key, %expires_at, "issued one-time code");
        Ok(code)
    }

    /// Check `code` for `email`. A match consumes the code.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the code is not six digits
    /// - `CodeNotFound` if nothing is pending for the email
    /// - `CodeExpired` if the code outlived its lifetime (it is discarded)
    /// - `CodeMismatch` if the code is wrong (the pending code stays valid)
    pub fn verify(&self, email: &str, code: &str) -> Result<()> {
        let key = normalize_email(email)?;
        let code = code.trim();
        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::invalid_input("a 6-digit code is required"));
        }

        match self.store.take_if(&key, |expected| expected == code)? {
            Take::Missing => {
                warn!(email = %key, "no pending code");
                Err(Error::CodeNotFound(key))
            }
            Take::Expired => {
                warn!(email = %key, "code expired");
                Err(Error::CodeExpired(key))
            }
            Take::Kept => {
                warn!(email = %key, "code mismatch");
                Err(Error::CodeMismatch(key))
            }
            Take::Taken(_) => {
                info!(email = %key, "code verified");
                Ok(())
            }
        }
    }

    /// Drop expired codes. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        self.store.purge_expired()
    }

    /// Codes still held, including expired ones not yet purged.
    pub fn pending(&self) -> Result<usize> {
        self.store.len()
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_ascii_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid {
        return Err(Error::invalid_input(format!("invalid email '{}'", email)));
    }
    Ok(email)
}
