// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for resubmission spam simulation.
//!
//! Drives the intake service with scripted bursts of valid and malformed
//! submissions on a manual clock and tallies the outcomes.

pub mod attacks;
pub mod generators;
pub mod metrics;
