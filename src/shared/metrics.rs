use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::value_objects::SyncScope;

pub const UNSET_TS: u64 = 0;

#[derive(Debug)]
struct OutcomeCounter {
    success: AtomicU64,
    failure: AtomicU64,
    last_success_ms: AtomicU64,
    last_failure_ms: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSnapshot {
    pub successes: u64,
    pub failures: u64,
    pub last_success_ms: Option<u64>,
    pub last_failure_ms: Option<u64>,
}

impl OutcomeCounter {
    const fn new() -> Self {
        Self {
            success: AtomicU64::new(0),
            failure: AtomicU64::new(0),
            last_success_ms: AtomicU64::new(UNSET_TS),
            last_failure_ms: AtomicU64::new(UNSET_TS),
        }
    }

    fn record(&self, succeeded: bool) {
        let now = current_unix_ms();
        if succeeded {
            self.success.fetch_add(1, Ordering::Relaxed);
            self.last_success_ms.store(now, Ordering::Relaxed);
        } else {
            self.failure.fetch_add(1, Ordering::Relaxed);
            self.last_failure_ms.store(now, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> OutcomeSnapshot {
        OutcomeSnapshot {
            successes: self.success.load(Ordering::Relaxed),
            failures: self.failure.load(Ordering::Relaxed),
            last_success_ms: timestamp_to_option(self.last_success_ms.load(Ordering::Relaxed)),
            last_failure_ms: timestamp_to_option(self.last_failure_ms.load(Ordering::Relaxed)),
        }
    }
}

/// Delivery outcomes reported back by the delivery channel, per scope.
#[derive(Debug)]
pub struct SyncOutcomeMetrics {
    orders: OutcomeCounter,
    inquiries: OutcomeCounter,
    preferences: OutcomeCounter,
    general: OutcomeCounter,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcomeSnapshot {
    pub orders: OutcomeSnapshot,
    pub inquiries: OutcomeSnapshot,
    pub preferences: OutcomeSnapshot,
    pub general: OutcomeSnapshot,
}

impl SyncOutcomeMetrics {
    pub const fn new() -> Self {
        Self {
            orders: OutcomeCounter::new(),
            inquiries: OutcomeCounter::new(),
            preferences: OutcomeCounter::new(),
            general: OutcomeCounter::new(),
        }
    }

    pub fn record(&self, scope: SyncScope, succeeded: bool) {
        self.counter(scope).record(succeeded);
    }

    pub fn snapshot(&self) -> SyncOutcomeSnapshot {
        SyncOutcomeSnapshot {
            orders: self.orders.snapshot(),
            inquiries: self.inquiries.snapshot(),
            preferences: self.preferences.snapshot(),
            general: self.general.snapshot(),
        }
    }

    fn counter(&self, scope: SyncScope) -> &OutcomeCounter {
        match scope {
            SyncScope::Orders => &self.orders,
            SyncScope::Inquiries => &self.inquiries,
            SyncScope::Preferences => &self.preferences,
            SyncScope::General => &self.general,
        }
    }
}

impl Default for SyncOutcomeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub fn current_unix_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(UNSET_TS)
}

#[inline]
pub fn timestamp_to_option(value: u64) -> Option<u64> {
    if value == UNSET_TS { None } else { Some(value) }
}
