//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A push notification managed through the console.
///
/// Unlike the other entities this one lives on the backend's non-admin
/// surface (`/notifications`), reused by the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// When the backend should deliver it; `None` means immediately
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Whether delivery already happened
    #[serde(default)]
    pub sent: bool,
}
