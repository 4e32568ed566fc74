// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! KO'MAK Intake
//!
//! Client-side guard for the KO'MAK application and survey forms:
//!
//! - Per-field validation driven by a rule table per form variant
//! - Aggregated reports listing every failing field, not just the first
//! - Resubmission cooldown (60 s default) persisted in a durable store
//! - Intake flow: validate, check cooldown, insert, start cooldown
//! - Generic user-facing message for persistence failures

pub mod clock;
pub mod config;
pub mod error;
pub mod intake;
pub mod options;
pub mod persistence;
pub mod store;
pub mod submission;
pub mod telemetry;
pub mod throttle;
pub mod validator;

pub use config::Config;
pub use intake::{IntakeService, SubmitOutcome};
pub use submission::{ApplicationForm, FormVariant, Selection, SurveyForm, TriState};
pub use throttle::{CooldownStatus, SubmissionThrottle};
pub use validator::{FieldValidator, ValidationError, ValidationReport};
