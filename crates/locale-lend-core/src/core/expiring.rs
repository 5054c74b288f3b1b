//! Expiring Store
//!
//! A time-indexed map whose entries disappear after a fixed lifetime.
//! Expired entries are evicted lazily on lookup and in bulk by
//! [`ExpiringStore::purge_expired`]. The clock is injected so expiry is
//! testable without sleeping.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{Error, Result};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }
}

/// Outcome of a lookup that distinguishes "never stored" from "too late".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Live(V),
    Expired,
    Missing,
}

/// Outcome of [`ExpiringStore::take_if`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Take<V> {
    /// The live value matched and was removed.
    Taken(V),
    /// The live value did not match and was kept.
    Kept,
    Expired,
    Missing,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Map with a per-store time-to-live.
pub struct ExpiringStore<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> ExpiringStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn with_system_clock(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<K, Entry<V>>>> {
        self.entries.lock().map_err(|e| Error::Internal(e.to_string()))
    }

    /// Store `value`, replacing any previous entry. Returns the expiry time.
    pub fn insert(&self, key: K, value: V) -> Result<DateTime<Utc>> {
        let expires_at = self.clock.now() + self.ttl;
        self.lock()?.insert(key, Entry { value, expires_at });
        Ok(expires_at)
    }

    /// Look up `key`, evicting it if it has expired.
    pub fn lookup(&self, key: &K) -> Result<Lookup<V>> {
        let now = self.clock.now();
        let mut entries = self.lock()?;

        match entries.get(key) {
            None => return Ok(Lookup::Missing),
            Some(entry) if now <= entry.expires_at => return Ok(Lookup::Live(entry.value.clone())),
            Some(_) => {}
        }

        entries.remove(key);
        Ok(Lookup::Expired)
    }

    /// The live value for `key`, if any.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(match self.lookup(key)? {
            Lookup::Live(value) => Some(value),
            Lookup::Expired | Lookup::Missing => None,
        })
    }

    /// Remove `key`, returning its value if it was still live.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let now = self.clock.now();
        Ok(self
            .lock()?
            .remove(key)
            .filter(|entry| now <= entry.expires_at)
            .map(|entry| entry.value))
    }

    /// Remove `key` if its live value satisfies `accept`.
    ///
    /// The check and the removal happen under one lock, so concurrent
    /// callers can never both take the same value. An expired entry is
    /// evicted.
    pub fn take_if<F>(&self, key: &K, accept: F) -> Result<Take<V>>
    where
        F: FnOnce(&V) -> bool,
    {
        let now = self.clock.now();
        let mut entries = self.lock()?;

        let (live, accepted) = match entries.get(key) {
            None => return Ok(Take::Missing),
            Some(entry) if now > entry.expires_at => (false, false),
            Some(entry) => (true, accept(&entry.value)),
        };

        if !live {
            entries.remove(key);
            return Ok(Take::Expired);
        }
        if !accepted {
            return Ok(Take::Kept);
        }
        Ok(entries
            .remove(key)
            .map_or(Take::Missing, |entry| Take::Taken(entry.value)))
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, remaining = entries.len(), "purged expired entries");
        }
        Ok(purged)
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
