//! Integration Tests: Email Verification Flow
//!
//! One-time codes driven through the commands with a manual clock:
//! - Issue and verify
//! - Expiry after the configured lifetime
//! - Wrong codes and reissue
//! - Purging stale codes

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use locale_lend_core::commands::verification::{purge_expired_codes, request_code, verify_code};
use locale_lend_core::{Error, LocaleLend, LocaleLendBuilder, ManualClock};

fn lend_with_clock() -> (LocaleLend, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
    ));
    let lend = LocaleLendBuilder::new()
        .clock(clock.clone())
        .build()
        .expect("default config is valid");
    (lend, clock)
}

fn wrong_code(code: &str) -> &'static str {
    if code == "000000" {
        "111111"
    } else {
        "000000"
    }
}

/// Test: a code verifies once within its lifetime
#[test]
fn test_code_verifies_once() {
    let (lend, clock) = lend_with_clock();
    let issued = request_code(&lend, "lender@example.com").unwrap();

    clock.advance(Duration::minutes(4));
    verify_code(&lend, "lender@example.com", &issued.code).unwrap();

    let replay = verify_code(&lend, "lender@example.com", &issued.code);
    assert!(matches!(replay, Err(Error::CodeNotFound(_))));
}

/// Test: a code is dead after five minutes
#[test]
fn test_code_expires() {
    let (lend, clock) = lend_with_clock();
    let issued = request_code(&lend, "lender@example.com").unwrap();

    clock.advance(Duration::minutes(5) + Duration::seconds(1));
    let late = verify_code(&lend, "lender@example.com", &issued.code);
    assert!(matches!(late, Err(Error::CodeExpired(_))));
    assert_eq!(late.unwrap_err().code(), "LEND_CODE_EXPIRED");

    // The expired code was discarded on lookup.
    let again = verify_code(&lend, "lender@example.com", &issued.code);
    assert!(matches!(again, Err(Error::CodeNotFound(_))));
}

/// Test: a wrong code leaves the pending one usable
#[test]
fn test_wrong_code_then_right_code() {
    let (lend, _) = lend_with_clock();
    let issued = request_code(&lend, "lender@example.com").unwrap();

    let wrong = verify_code(&lend, "lender@example.com", wrong_code(&issued.code));
    assert!(matches!(wrong, Err(Error::CodeMismatch(_))));

    verify_code(&lend, "LENDER@example.com", &issued.code).unwrap();
}

/// Test: requesting again restarts the lifetime
#[test]
fn test_reissue_restarts_lifetime() {
    let (lend, clock) = lend_with_clock();
    request_code(&lend, "lender@example.com").unwrap();

    clock.advance(Duration::minutes(4));
    let second = request_code(&lend, "lender@example.com").unwrap();

    clock.advance(Duration::minutes(4));
    verify_code(&lend, "lender@example.com", &second.code).unwrap();
}

/// Test: racing verifications of one code succeed once
#[test]
fn test_concurrent_verification() {
    let (lend, _) = lend_with_clock();
    let lend = Arc::new(lend);
    let issued = request_code(&lend, "lender@example.com").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lend = lend.clone();
            let code = issued.code.clone();
            std::thread::spawn(move || verify_code(&lend, "lender@example.com", &code))
        })
        .collect();
    let verified = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|outcome| outcome.is_ok())
        .count();

    assert_eq!(verified, 1);
}

/// Test: purge drops only the stale codes
#[test]
fn test_purge_expired_codes() {
    let (lend, clock) = lend_with_clock();
    request_code(&lend, "first@example.com").unwrap();
    clock.advance(Duration::minutes(3));
    let fresh = request_code(&lend, "second@example.com").unwrap();
    clock.advance(Duration::minutes(3));

    assert_eq!(purge_expired_codes(&lend).unwrap(), 1);
    assert_eq!(lend.codes().pending().unwrap(), 1);
    verify_code(&lend, "second@example.com", &fresh.code).unwrap();
}

/// Test: a shorter configured lifetime is honored
#[test]
fn test_custom_lifetime() {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()));
    let lend = LocaleLendBuilder::new()
        .otp_ttl(Duration::seconds(60))
        .clock(clock.clone())
        .build()
        .unwrap();

    let issued = request_code(&lend, "lender@example.com").unwrap();
    assert_eq!(issued.expires_in_seconds, 60);

    clock.advance(Duration::seconds(61));
    assert!(matches!(
        verify_code(&lend, "lender@example.com", &issued.code),
        Err(Error::CodeExpired(_))
    ));
}
