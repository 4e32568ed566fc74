// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the intake guard.
//!
//! Field validation failures live in [`crate::validator::ValidationError`];
//! they are display state, not errors that propagate.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Missing persistence credential: set {0}")]
    MissingCredential(&'static str),

    #[error("Invalid persistence URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Durable key-value store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Remote persistence errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Persistence request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Persistence backend rejected insert into {table} with status {status}: {body}")]
    Rejected {
        table: String,
        status: u16,
        body: String,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Persistence backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
