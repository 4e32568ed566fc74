// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission intake flow.
//!
//! 1. Validate every field; stop with the full report on any failure.
//! 2. Check the cooldown; stop with the remaining wait if one is running.
//! 3. Insert the record into the remote store.
//! 4. On success, start a new cooldown window.
//!
//! Every outcome maps to a message the form can show as is. Persistence
//! failures are logged in full but shown to the user only as a generic
//! retry-later message.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::ConfigError;
use crate::persistence::{Ack, RestSink, SubmissionSink};
use crate::store::{FileStore, KeyValueStore};
use crate::submission::{FormVariant, Submission};
use crate::throttle::{CooldownStatus, SubmissionThrottle};
use crate::validator::{FieldValidator, ValidationReport};
use tracing::{error, info, warn};

/// Shown when the remote insert fails, whatever the reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "Xatolik yuz berdi. Iltimos, keyinroq urinib ko'ring.";

/// Shown after an accepted submission.
pub const SUCCESS_MESSAGE: &str =
    "Muvaffaqiyatli yuborildi! Arizangiz qabul qilindi. Tez orada siz bilan bog'lanamiz.";

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored; a new cooldown window has started
    Accepted(Ack),
    /// One or more fields failed validation; nothing was stored
    Rejected(ValidationReport),
    /// A previous submission is still cooling down
    Throttled { remaining_secs: u64 },
    /// The remote store refused or could not be reached
    Failed,
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Message for the form's status banner. Validation failures return
    /// `None`: their messages belong next to the individual fields.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Accepted(_) => Some(SUCCESS_MESSAGE.to_string()),
            Self::Rejected(_) => None,
            Self::Throttled { remaining_secs } => Some(format!(
                "Iltimos, {remaining_secs} soniyadan keyin qayta urinib ko'ring."
            )),
            Self::Failed => Some(GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }
}

/// Runs submissions through validation, cooldown and persistence.
pub struct IntakeService<S, K, C> {
    validator: FieldValidator,
    throttle: SubmissionThrottle<K, C>,
    sink: S,
    /// Overrides the per-variant table for every submission
    table: Option<String>,
}

impl IntakeService<RestSink, FileStore, SystemClock> {
    /// Production wiring: PostgREST sink, file-backed cooldown, system clock.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let sink = RestSink::from_config(&config.persistence)?;
        let store = FileStore::from_config(&config.storage);
        info!(
            variant = %config.variant,
            table_override = ?config.persistence.table,
            store = %store.path().display(),
            window_ms = config.cooldown.window_ms,
            "Intake service configured"
        );

        let service = Self::new(
            FieldValidator::new(),
            SubmissionThrottle::new(store, &config.cooldown),
            sink,
        );
        Ok(match &config.persistence.table {
            Some(table) => service.with_table(table.clone()),
            None => service,
        })
    }
}

impl<S, K, C> IntakeService<S, K, C>
where
    S: SubmissionSink,
    K: KeyValueStore,
    C: Clock,
{
    /// Each submission is written to its variant's default table.
    pub fn new(validator: FieldValidator, throttle: SubmissionThrottle<K, C>, sink: S) -> Self {
        Self {
            validator,
            throttle,
            sink,
            table: None,
        }
    }

    /// Write every submission to `table`, whatever its variant.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Table a submission of `variant` is written to.
    pub fn table_for(&self, variant: FormVariant) -> &str {
        self.table
            .as_deref()
            .unwrap_or_else(|| variant.default_table())
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    pub fn throttle(&self) -> &SubmissionThrottle<K, C> {
        &self.throttle
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Current cooldown, for the once-per-second countdown display.
    pub fn cooldown(&self) -> CooldownStatus {
        self.throttle.check_cooldown()
    }

    /// Attempt one submission.
    pub async fn submit<F: Submission + ?Sized>(&self, form: &F) -> SubmitOutcome {
        let variant = form.variant();

        let report = self.validator.validate(form);
        if !report.is_valid() {
            info!(%variant, failed = ?report.fields().collect::<Vec<_>>(), "Submission rejected");
            return SubmitOutcome::Rejected(report);
        }

        let cooldown = self.throttle.check_cooldown();
        if cooldown.in_cooldown {
            warn!(%variant, remaining_secs = cooldown.remaining_secs, "Submission throttled");
            return SubmitOutcome::Throttled {
                remaining_secs: cooldown.remaining_secs,
            };
        }

        let Some(record) = form.to_record() else {
            error!(%variant, "Validated submission could not be converted to a record");
            return SubmitOutcome::Failed;
        };

        let table = self.table_for(variant);
        match self.sink.insert(table, &record).await {
            Ok(ack) => {
                self.throttle.start_cooldown();
                info!(%variant, table, "Submission stored");
                SubmitOutcome::Accepted(ack)
            }
            Err(e) => {
                error!(%variant, table, error = %e, "Failed to store submission");
                SubmitOutcome::Failed
            }
        }
    }
}
