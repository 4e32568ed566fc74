// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for spam simulation results.

use komak_intake::intake::SubmitOutcome;
use std::collections::HashMap;
use std::fmt;

/// Possible outcomes for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    Rejected,
    Throttled,
    Failed,
}

impl From<&SubmitOutcome> for Outcome {
    fn from(outcome: &SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Accepted(_) => Self::Accepted,
            SubmitOutcome::Rejected(_) => Self::Rejected,
            SubmitOutcome::Throttled { .. } => Self::Throttled,
            SubmitOutcome::Failed => Self::Failed,
        }
    }
}

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct SpamMetrics {
    outcomes: HashMap<Outcome, usize>,
    /// Remaining seconds reported by throttled attempts
    waits: Vec<u64>,
    /// User-facing messages seen, for leak checks
    messages: Vec<String>,
}

impl SpamMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &SubmitOutcome) {
        *self.outcomes.entry(Outcome::from(outcome)).or_insert(0) += 1;
        if let SubmitOutcome::Throttled { remaining_secs } = outcome {
            self.waits.push(*remaining_secs);
        }
        if let Some(message) = outcome.message() {
            self.messages.push(message);
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn waits(&self) -> &[u64] {
        &self.waits
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl fmt::Display for SpamMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempts={} accepted={} rejected={} throttled={} failed={}",
            self.total(),
            self.count(Outcome::Accepted),
            self.count(Outcome::Rejected),
            self.count(Outcome::Throttled),
            self.count(Outcome::Failed),
        )
    }
}
