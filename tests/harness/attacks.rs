// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Spam patterns for security testing.

use std::time::Duration;

/// Spam pattern configuration.
#[derive(Debug, Clone)]
pub struct SpamConfig {
    /// Total number of submission attempts
    pub total_attempts: usize,
    /// Simulated time between attempts
    pub interval: Duration,
    /// Share of attempts carrying malformed data (0.0-1.0)
    pub invalid_ratio: f64,
    /// Make the backend fail on every n-th insert attempt
    pub backend_failure_every: Option<usize>,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            total_attempts: 100,
            interval: Duration::from_secs(1),
            invalid_ratio: 0.0,
            backend_failure_every: None,
        }
    }
}

/// Predefined spam patterns.
impl SpamConfig {
    /// Button mashing: many valid resubmissions in quick succession.
    pub fn rapid_resubmit() -> Self {
        Self {
            total_attempts: 300,
            interval: Duration::from_millis(200),
            ..Default::default()
        }
    }

    /// Scripted resubmission paced just under the window.
    pub fn paced_resubmit() -> Self {
        Self {
            total_attempts: 40,
            interval: Duration::from_secs(59),
            ..Default::default()
        }
    }

    /// Bot filling the form with junk.
    pub fn junk_flood() -> Self {
        Self {
            total_attempts: 200,
            interval: Duration::from_millis(100),
            invalid_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Half junk, half valid, with a flaky backend.
    pub fn mixed_with_outages() -> Self {
        Self {
            total_attempts: 240,
            interval: Duration::from_secs(2),
            invalid_ratio: 0.5,
            backend_failure_every: Some(3),
        }
    }

    /// Upper bound on accepted submissions: one per started window.
    pub fn max_accepted(&self, window: Duration) -> usize {
        if self.total_attempts == 0 {
            return 0;
        }
        let span = self.interval.as_millis() * (self.total_attempts as u128 - 1);
        (span / window.as_millis()) as usize + 1
    }
}

/// Deterministic stand-in for a coin flip with probability `ratio`.
pub fn pick(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}
