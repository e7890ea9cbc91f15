//! Resource descriptors and the generic CRUD surface
//!
//! Every screen talks to exactly one backend collection. Instead of one
//! hand-written client per screen, a [`Resource`] names the collection and
//! the generic calls below cover list/fetch/create/update/delete for all of
//! them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{rows_from, BackendClient, ClientError};
use crate::models::ListParams;

/// Descriptor for one backend collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Path relative to the API base, e.g. `/admin/users`.
    pub path: &'static str,
    /// Stable key for screen-level caching and logging.
    pub key: &'static str,
}

impl Resource {
    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, urlencoding::encode(id))
    }
}

pub const USERS: Resource = Resource { path: "/admin/users", key: "users" };
pub const CYCLE_PHASES: Resource = Resource { path: "/admin/cycle-phases", key: "cycle-phases" };
pub const SEQUENCES: Resource = Resource { path: "/admin/sequences", key: "sequences" };
pub const SESSIONS: Resource = Resource { path: "/admin/sessions", key: "sessions" };
pub const STEPS: Resource = Resource { path: "/admin/steps", key: "steps" };
pub const MEDIA: Resource = Resource { path: "/admin/media", key: "media" };
pub const VIDEOS: Resource = Resource { path: "/admin/videos", key: "videos" };
pub const LOGS: Resource = Resource { path: "/admin/logs", key: "logs" };
pub const CYCLES: Resource = Resource { path: "/admin/cycles", key: "cycles" };
pub const SUBSCRIPTIONS: Resource = Resource { path: "/admin/subscriptions", key: "subscriptions" };
pub const GIFTS: Resource = Resource { path: "/admin/gifts", key: "gifts" };
// Reused from the non-admin surface, hence no /admin prefix.
pub const NOTIFICATIONS: Resource = Resource { path: "/notifications", key: "notifications" };

/// Path of the dashboard stats document (not a CRUD collection).
pub const DASHBOARD_STATS_PATH: &str = "/admin/dashboard/stats";

impl BackendClient {
    /// Fetch a collection as raw rows, for the generic grid screens.
    pub async fn list_raw(
        &self,
        token: &str,
        resource: &Resource,
        params: &ListParams,
    ) -> Result<Vec<Value>, ClientError> {
        let value: Value = self
            .get_json(token, resource.path, &params.to_query())
            .await?;
        rows_from(value)
    }

    /// Fetch a collection as typed records (grouping screens).
    ///
    /// Rows that fail to decode are dropped with a warning rather than
    /// failing the whole screen; the backend owns the shape, the console
    /// only mirrors it.
    pub async fn list<T: DeserializeOwned>(
        &self,
        token: &str,
        resource: &Resource,
        params: &ListParams,
    ) -> Result<Vec<T>, ClientError> {
        let rows = self.list_raw(token, resource, params).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(resource = resource.key, error = %e, "Dropping undecodable row");
                }
            }
        }
        Ok(records)
    }

    /// Fetch one record by id.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        token: &str,
        resource: &Resource,
        id: &str,
    ) -> Result<T, ClientError> {
        self.get_json(token, &resource.item_path(id), &[]).await
    }

    /// Create a record; returns the backend's echo of it.
    pub async fn create<B: Serialize>(
        &self,
        token: &str,
        resource: &Resource,
        body: &B,
    ) -> Result<Value, ClientError> {
        self.post_json(token, resource.path, body).await
    }

    /// Update a record by id.
    pub async fn update<B: Serialize>(
        &self,
        token: &str,
        resource: &Resource,
        id: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        self.put_json(token, &resource.item_path(id), body).await
    }

    /// Delete a record by id.
    pub async fn remove(
        &self,
        token: &str,
        resource: &Resource,
        id: &str,
    ) -> Result<(), ClientError> {
        self.delete(token, &resource.item_path(id)).await
    }

    /// Upload to a collection's multipart endpoint.
    pub async fn upload(
        &self,
        token: &str,
        resource: &Resource,
        form: reqwest::multipart::Form,
    ) -> Result<Value, ClientError> {
        self.post_multipart(token, resource.path, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_paths_encode_ids() {
        assert_eq!(USERS.item_path("abc123"), "/admin/users/abc123");
        // ids are backend-assigned, but nothing stops a hostile query string
        assert_eq!(GIFTS.item_path("a/b"), "/admin/gifts/a%2Fb");
    }

    #[test]
    fn notifications_skip_the_admin_prefix() {
        assert_eq!(NOTIFICATIONS.path, "/notifications");
        assert_eq!(CYCLE_PHASES.path, "/admin/cycle-phases");
    }
}
