//! Generic screen listing pipeline
//!
//! One parameterized load path instantiated by every grid screen: fetch the
//! collection, remember it as the screen's snapshot, and on a failed refetch
//! serve the previous rows alongside the error message instead of blanking
//! the screen. 401 is the exception: it propagates so the web layer can
//! evict the session and redirect to login.

use moka::future::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{BackendClient, ClientError, Resource};
use crate::config::SnapshotConfig;
use crate::models::ListParams;

/// Result of loading one screen's rows.
#[derive(Debug, Clone)]
pub struct ScreenOutcome {
    pub rows: Vec<Value>,
    /// Flash-worthy message when the fetch failed
    pub error: Option<String>,
    /// True when `rows` came from the snapshot, not this fetch
    pub stale: bool,
}

impl ScreenOutcome {
    fn fresh(rows: Vec<Value>) -> Self {
        Self {
            rows,
            error: None,
            stale: false,
        }
    }
}

/// Per-session snapshots of the last successfully fetched rows, keyed by
/// (session token, screen + query) so a failed refetch of one page or
/// filter pass never serves rows cached for another.
#[derive(Clone)]
pub struct SnapshotStore {
    cache: Cache<(String, String), Arc<Vec<Value>>>,
}

fn snapshot_key(token: &str, resource: &Resource, params: &ListParams) -> (String, String) {
    let mut screen = resource.key.to_string();
    for (i, (key, value)) in params.to_query().iter().enumerate() {
        screen.push(if i == 0 { '?' } else { '&' });
        screen.push_str(key);
        screen.push('=');
        screen.push_str(value);
    }
    (token.to_string(), screen)
}

impl SnapshotStore {
    pub fn new(config: &SnapshotConfig) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(config.capacity)
                .time_to_live(Duration::from_secs(config.ttl_secs))
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Fetch a screen's rows, falling back to the snapshot on failure.
    ///
    /// Returns `Err` only for 401; all other failures degrade into an
    /// outcome carrying the error message and whatever rows are still known.
    pub async fn load(
        &self,
        client: &BackendClient,
        token: &str,
        resource: &Resource,
        params: &ListParams,
    ) -> Result<ScreenOutcome, ClientError> {
        match client.list_raw(token, resource, params).await {
            Ok(rows) => {
                self.cache
                    .insert(snapshot_key(token, resource, params), Arc::new(rows.clone()))
                    .await;
                Ok(ScreenOutcome::fresh(rows))
            }
            Err(e) if e.is_unauthorized() => Err(e),
            Err(e) => {
                tracing::warn!(resource = resource.key, error = %e, "List fetch failed");
                let snapshot = self.cache.get(&snapshot_key(token, resource, params)).await;
                let rows = snapshot.map(|s| s.as_ref().clone()).unwrap_or_default();
                Ok(ScreenOutcome {
                    stale: !rows.is_empty(),
                    rows,
                    error: Some(e.user_message()),
                })
            }
        }
    }

    /// Drop every snapshot belonging to a session (logout).
    pub fn forget_session(&self, token: &str) {
        let token = token.to_string();
        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |(t, _), _| *t == token)
        {
            tracing::warn!(error = %e, "Failed to drop session snapshots");
        }
    }
}

/// Decode snapshot rows into typed records, dropping rows that no longer
/// match the expected shape instead of failing the screen.
pub fn typed_rows<T: serde::de::DeserializeOwned>(rows: &[Value]) -> Vec<T> {
    rows.iter()
        .filter_map(|row| serde_json::from_value(row.clone()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::resources;

    #[test]
    fn snapshot_keys_distinguish_pages_and_filters() {
        let full = snapshot_key("tok", &resources::LOGS, &ListParams::all());
        let page2 = snapshot_key("tok", &resources::LOGS, &ListParams::paged(Some(2), Some(50)));
        let filtered = snapshot_key(
            "tok",
            &resources::LOGS,
            &ListParams::all().with_filter("level", Some("error")),
        );

        assert_eq!(full.1, "logs");
        assert_eq!(page2.1, "logs?page=2&limit=50");
        assert_eq!(filtered.1, "logs?level=error");
        assert_ne!(full, page2);
    }

    #[test]
    fn typed_rows_skip_malformed_entries() {
        let rows = vec![
            serde_json::json!({"_id": "a", "name": "ok", "cyclePhase": "p"}),
            serde_json::json!({"name": "missing id"}),
        ];
        let typed: Vec<crate::models::Sequence> = typed_rows(&rows);
        assert_eq!(typed.len(), 1);
        assert_eq!(typed[0].id, "a");
    }

    #[test]
    fn outcome_defaults() {
        let outcome = ScreenOutcome::fresh(vec![serde_json::json!({"_id": "a"})]);
        assert!(!outcome.stale);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.rows.len(), 1);
    }
}
