// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Resubmission cooldown.
//!
//! After a successful submission the client waits one window (60 s default)
//! before it may submit again. The only state is the timestamp of the last
//! success, kept in a durable [`KeyValueStore`]. Expiry is lazy: the next
//! read past the window clears the stored value.
//!
//! The decision itself is the pure [`resolve`]; [`SubmissionThrottle`]
//! applies the store effect it returns.

use crate::clock::{Clock, SystemClock};
use crate::config::CooldownConfig;
use crate::store::KeyValueStore;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Cooldown as seen by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownStatus {
    pub in_cooldown: bool,
    pub remaining_secs: u64,
}

impl CooldownStatus {
    /// Submissions allowed.
    pub const READY: Self = Self {
        in_cooldown: false,
        remaining_secs: 0,
    };

    fn waiting(remaining_secs: u64) -> Self {
        Self {
            in_cooldown: true,
            remaining_secs,
        }
    }
}

/// Store mutation a cooldown read calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEffect {
    /// Leave the stored timestamp as is
    Keep,
    /// The stored timestamp has expired; remove it
    Clear,
}

/// Decide the cooldown state at `now_ms` given the stored timestamp.
///
/// A timestamp in the future counts as zero elapsed time, so the wait never
/// exceeds one window.
pub fn resolve(now_ms: i64, stored_ms: Option<i64>, window: Duration) -> (CooldownStatus, StoreEffect) {
    let Some(last) = stored_ms else {
        return (CooldownStatus::READY, StoreEffect::Keep);
    };

    let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
    let elapsed_ms = u64::try_from(now_ms.saturating_sub(last)).unwrap_or(0);

    if elapsed_ms >= window_ms {
        return (CooldownStatus::READY, StoreEffect::Clear);
    }

    let remaining_ms = window_ms - elapsed_ms;
    (
        CooldownStatus::waiting(remaining_ms.div_ceil(1000)),
        StoreEffect::Keep,
    )
}

/// Persisted single-timestamp submission gate.
pub struct SubmissionThrottle<S, C = SystemClock> {
    store: S,
    clock: C,
    key: String,
    window: Duration,
}

impl<S: KeyValueStore> SubmissionThrottle<S, SystemClock> {
    /// Create a throttle on the system clock.
    pub fn new(store: S, config: &CooldownConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S: KeyValueStore, C: Clock> SubmissionThrottle<S, C> {
    pub fn with_clock(store: S, clock: C, config: &CooldownConfig) -> Self {
        Self {
            store,
            clock,
            key: config.storage_key.clone(),
            window: config.window(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report whether a submission must wait, clearing an expired timestamp.
    pub fn check_cooldown(&self) -> CooldownStatus {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read cooldown timestamp");
                return CooldownStatus::READY;
            }
        };

        let (status, effect) = match raw.as_deref().map(|s| s.trim().parse::<i64>()) {
            None => resolve(self.clock.now_ms(), None, self.window),
            Some(Ok(last)) => resolve(self.clock.now_ms(), Some(last), self.window),
            Some(Err(_)) => {
                warn!(key = %self.key, value = ?raw, "Discarding unparseable cooldown timestamp");
                (CooldownStatus::READY, StoreEffect::Clear)
            }
        };

        if effect == StoreEffect::Clear {
            debug!(key = %self.key, "Cooldown expired");
            self.clear_cooldown();
        }

        status
    }

    /// Start a new window from now, overwriting any previous timestamp.
    pub fn start_cooldown(&self) {
        let now = self.clock.now_ms();
        match self.store.set(&self.key, &now.to_string()) {
            Ok(()) => debug!(key = %self.key, at_ms = now, "Cooldown started"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to persist cooldown timestamp"),
        }
    }

    /// Drop any stored timestamp (administrative reset).
    pub fn clear_cooldown(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to clear cooldown timestamp");
        }
    }
}
