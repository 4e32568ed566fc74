// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Remote persistence for accepted submissions.
//!
//! The intake flow only needs "insert one row, tell me if it worked".
//! [`RestSink`] talks to a PostgREST endpoint (Supabase exposes one at
//! `/rest/v1`); [`MemorySink`] keeps rows in memory.

use crate::config::PersistenceConfig;
use crate::error::{ConfigError, PersistenceError};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use url::Url;

/// Acknowledgement of a successful insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    pub table: String,
    /// Rows echoed back by the backend, if it returns any
    pub rows: Vec<JsonValue>,
}

/// Insert-only store for accepted submissions.
#[allow(async_fn_in_trait)]
pub trait SubmissionSink {
    async fn insert<R: Serialize + Sync>(&self, table: &str, record: &R) -> Result<Ack, PersistenceError>;
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for &S {
    async fn insert<R: Serialize + Sync>(&self, table: &str, record: &R) -> Result<Ack, PersistenceError> {
        (**self).insert(table, record).await
    }
}

/// PostgREST client.
pub struct RestSink {
    base_url: Url,
    api_key: String,
    schema: String,
    client: reqwest::Client,
}

impl RestSink {
    /// Create a new client for the project at `base_url`.
    pub fn new(base_url: Url, api_key: String, schema: String) -> Self {
        Self {
            base_url,
            api_key,
            schema,
            client: reqwest::Client::new(),
        }
    }

    /// Build from configuration, failing if the URL or key is missing.
    pub fn from_config(config: &PersistenceConfig) -> Result<Self, ConfigError> {
        let (base_url, api_key) = config.credentials()?;
        Ok(Self::new(base_url, api_key, config.schema.clone()))
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.as_str().trim_end_matches('/'),
            urlencode_segment(table)
        )
    }
}

impl SubmissionSink for RestSink {
    async fn insert<R: Serialize + Sync>(&self, table: &str, record: &R) -> Result<Ack, PersistenceError> {
        let body = serde_json::to_value([record])?;

        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let rows = match response.json::<JsonValue>().await {
                Ok(JsonValue::Array(rows)) => rows,
                Ok(_) | Err(_) => Vec::new(),
            };
            Ok(Ack {
                table: table.to_string(),
                rows,
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PersistenceError::Rejected {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Percent-encode a table name for use as a single path segment.
fn urlencode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// In-memory sink that records inserted rows.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Mutex<Vec<(String, JsonValue)>>,
    failure: Mutex<Option<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following insert fail with `reason` (`None` restores).
    pub async fn fail_with(&self, reason: Option<&str>) {
        *self.failure.lock().await = reason.map(str::to_string);
    }

    /// Rows inserted so far, as `(table, row)` pairs.
    pub async fn rows(&self) -> Vec<(String, JsonValue)> {
        self.rows.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

impl SubmissionSink for MemorySink {
    async fn insert<R: Serialize + Sync>(&self, table: &str, record: &R) -> Result<Ack, PersistenceError> {
        if let Some(reason) = self.failure.lock().await.clone() {
            return Err(PersistenceError::Unavailable(reason));
        }

        let row = serde_json::to_value(record)?;
        self.rows.lock().await.push((table.to_string(), row.clone()));
        Ok(Ack {
            table: table.to_string(),
            rows: vec![row],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_sink_requires_credentials() {
        assert!(matches!(
            RestSink::from_config(&PersistenceConfig::default()),
            Err(ConfigError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_table_url() {
        let sink = RestSink::new(
            Url::parse("https://project.supabase.co/").unwrap(),
            "anon".to_string(),
            "public".to_string(),
        );
        assert_eq!(
            sink.table_url("applications"),
            "https://project.supabase.co/rest/v1/applications"
        );
        assert_eq!(
            sink.table_url("odd name/x"),
            "https://project.supabase.co/rest/v1/odd%20name%2Fx"
        );
    }

    #[test]
    fn test_memory_sink_records_rows() {
        let sink = MemorySink::new();
        let ack = tokio_test::block_on(sink.insert("applications", &json!({ "age": 21 }))).unwrap();
        assert_eq!(ack.table, "applications");
        assert_eq!(ack.rows, vec![json!({ "age": 21 })]);

        let rows = tokio_test::block_on(sink.rows());
        assert_eq!(rows, vec![("applications".to_string(), json!({ "age": 21 }))]);
    }

    #[tokio::test]
    async fn test_memory_sink_failure() {
        let sink = MemorySink::new();
        sink.fail_with(Some("quota exceeded")).await;
        let err = sink.insert("applications", &json!({})).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
        assert!(sink.is_empty().await);

        sink.fail_with(None).await;
        assert!(sink.insert("applications", &json!({})).await.is_ok());
        assert_eq!(sink.len().await, 1);
    }

    #[tokio::test]
    #[ignore] // Requires a reachable PostgREST endpoint in KOMAK_PERSISTENCE__URL
    async fn test_rest_insert() {
        let config = crate::config::Config::load(None).unwrap();
        let sink = RestSink::from_config(&config.persistence).unwrap();
        let result = sink.insert(config.table(), &json!({ "probe": true })).await;
        assert!(result.is_ok());
    }
}
