//! Balance snapshot caching
//!
//! The host reads the token balance through a [`BalanceReader`] and keeps the
//! formatted value here. A snapshot older than the stale time is refetched on
//! next use, and closing the wizard after a successful transfer invalidates it.
//!
//! [`BalanceReader`]: crate::transfer::BalanceReader

use std::time::{Duration, Instant};

use alloy::primitives::U256;
use tracing::debug;

use crate::transfer::amount::format_token_balance;

/// Default stale time for a balance read
pub const DEFAULT_BALANCE_STALE_TIME: Duration = Duration::from_secs(5);

/// A balance read at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub raw: U256,
    /// Grouped display value with at most two fraction digits
    pub formatted: String,
    pub fetched_at: Instant,
}

impl BalanceSnapshot {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self {
            raw,
            formatted: format_token_balance(raw, decimals),
            fetched_at: Instant::now(),
        }
    }
}

/// Holds the last balance snapshot and decides when to refetch
#[derive(Debug, Clone)]
pub struct BalanceCache {
    snapshot: Option<BalanceSnapshot>,
    stale_time: Duration,
    refresh_key: u64,
}

impl Default for BalanceCache {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE_STALE_TIME)
    }
}

impl BalanceCache {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            snapshot: None,
            stale_time,
            refresh_key: 0,
        }
    }

    pub fn snapshot(&self) -> Option<&BalanceSnapshot> {
        self.snapshot.as_ref()
    }

    /// Formatted balance, if one has been read
    pub fn formatted(&self) -> Option<&str> {
        self.snapshot.as_ref().map(|s| s.formatted.as_str())
    }

    /// Incremented every time the cache is invalidated
    pub fn refresh_key(&self) -> u64 {
        self.refresh_key
    }

    pub fn needs_refresh(&self, now: Instant) -> bool {
        match &self.snapshot {
            Some(snapshot) => now.saturating_duration_since(snapshot.fetched_at) > self.stale_time,
            None => true,
        }
    }

    pub fn store(&mut self, snapshot: BalanceSnapshot) {
        debug!(balance = %snapshot.formatted, "Balance updated");
        self.snapshot = Some(snapshot);
    }

    /// Drop the current snapshot and bump the refresh key
    pub fn invalidate(&mut self) {
        self.refresh_key = self.refresh_key.wrapping_add(1);
        self.snapshot = None;
        debug!(refresh_key = self.refresh_key, "Balance invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_needs_refresh() {
        let cache = BalanceCache::default();
        assert!(cache.needs_refresh(Instant::now()));
        assert!(cache.formatted().is_none());
    }

    #[test]
    fn test_snapshot_goes_stale() {
        let mut cache = BalanceCache::new(Duration::from_secs(5));
        let snapshot = BalanceSnapshot::new(U256::from(100_000_000_000_000_000_000u128), 18);
        let fetched_at = snapshot.fetched_at;
        cache.store(snapshot);

        assert_eq!(cache.formatted(), Some("100"));
        assert!(!cache.needs_refresh(fetched_at + Duration::from_secs(4)));
        assert!(cache.needs_refresh(fetched_at + Duration::from_secs(6)));
    }

    #[test]
    fn test_invalidate_bumps_refresh_key() {
        let mut cache = BalanceCache::default();
        cache.store(BalanceSnapshot::new(U256::from(1u64), 0));

        let before = cache.refresh_key();
        cache.invalidate();

        assert_eq!(cache.refresh_key(), before + 1);
        assert!(cache.snapshot().is_none());
        assert!(cache.needs_refresh(Instant::now()));
    }
}
