//! Explicit session cache state.
//!
//! Holds the last-used filter selection and the known ad-account list with
//! a fixed validity window (24 hours by default). Writes are last-write-wins
//! keyed on the fetch timestamp; a stale account list is never served.

use std::path::PathBuf;

use adpulse_core::types::{AdAccount, FilterSpec};
use adpulse_core::AdPulseResult;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::persist;

/// The persisted cache payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheState {
    pub last_filters: Option<FilterSpec>,
    pub accounts: Vec<AdAccount>,
    pub accounts_fetched_at: Option<DateTime<Utc>>,
}

impl CacheState {
    /// An account list older than the validity window (or never fetched)
    /// is stale and must be refetched.
    pub fn is_stale(&self, now: DateTime<Utc>, validity: Duration) -> bool {
        match self.accounts_fetched_at {
            Some(fetched_at) => now - fetched_at > validity,
            None => true,
        }
    }
}

/// Thread-safe session cache with optional JSON file persistence.
pub struct SessionCache {
    state: RwLock<CacheState>,
    validity: Duration,
    path: Option<PathBuf>,
}

impl SessionCache {
    pub fn new(validity_hours: u64) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            validity: Duration::hours(validity_hours as i64),
            path: None,
        }
    }

    /// Build a cache backed by a JSON file, seeding state from the file
    /// when it exists. A missing or unreadable file starts empty.
    pub fn with_persistence(path: impl Into<PathBuf>, validity_hours: u64) -> Self {
        let path = path.into();
        let state = persist::load_state(&path).unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "Starting with empty session cache");
            CacheState::default()
        });
        Self {
            state: RwLock::new(state),
            validity: Duration::hours(validity_hours as i64),
            path: Some(path),
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.state.read().is_stale(now, self.validity)
    }

    /// The cached account list, or `None` when stale or never fetched.
    pub fn accounts(&self, now: DateTime<Utc>) -> Option<Vec<AdAccount>> {
        let state = self.state.read();
        if state.is_stale(now, self.validity) {
            metrics::counter!("cache.accounts.miss").increment(1);
            return None;
        }
        metrics::counter!("cache.accounts.hit").increment(1);
        Some(state.accounts.clone())
    }

    /// Store a freshly fetched account list. Last-write-wins on the fetch
    /// timestamp: a write older than the stored one is dropped.
    pub fn store_accounts(&self, accounts: Vec<AdAccount>, fetched_at: DateTime<Utc>) -> bool {
        let mut state = self.state.write();
        if let Some(stored_at) = state.accounts_fetched_at {
            if fetched_at < stored_at {
                debug!("Dropping account list older than the cached one");
                return false;
            }
        }
        state.accounts = accounts;
        state.accounts_fetched_at = Some(fetched_at);
        true
    }

    pub fn last_filters(&self) -> Option<FilterSpec> {
        self.state.read().last_filters.clone()
    }

    pub fn store_filters(&self, filters: FilterSpec) {
        self.state.write().last_filters = Some(filters);
    }

    pub fn snapshot(&self) -> CacheState {
        self.state.read().clone()
    }

    /// Write the current state to the backing file, if one is configured.
    pub fn persist(&self) -> AdPulseResult<()> {
        if let Some(path) = &self.path {
            persist::save_state(path, &self.state.read())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str) -> AdAccount {
        AdAccount {
            id: id.to_string(),
            name: format!("Account {id}"),
        }
    }

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = SessionCache::new(24);
        assert!(cache.is_stale(Utc::now()));
        assert!(cache.accounts(Utc::now()).is_none());
    }

    #[test]
    fn test_accounts_served_within_validity_window() {
        let cache = SessionCache::new(24);
        let now = Utc::now();
        cache.store_accounts(vec![account("1")], now);

        assert_eq!(cache.accounts(now).map(|a| a.len()), Some(1));
        assert!(cache
            .accounts(now + Duration::hours(23))
            .is_some());
        assert!(cache
            .accounts(now + Duration::hours(25))
            .is_none());
    }

    #[test]
    fn test_last_write_wins_on_timestamp() {
        let cache = SessionCache::new(24);
        let now = Utc::now();
        assert!(cache.store_accounts(vec![account("new")], now));
        // An older fetch result arriving late must not clobber the cache.
        assert!(!cache.store_accounts(vec![account("old")], now - Duration::hours(1)));

        let accounts = cache.accounts(now).unwrap();
        assert_eq!(accounts[0].id, "new");
    }

    #[test]
    fn test_filters_round_trip() {
        let cache = SessionCache::new(24);
        assert!(cache.last_filters().is_none());

        let filters = FilterSpec {
            campaign_name: Some("Spring Launch".to_string()),
            ..Default::default()
        };
        cache.store_filters(filters.clone());
        assert_eq!(cache.last_filters(), Some(filters));
    }
}
