//! Backend log entry model (read-only screen)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub level: String,
    pub message: String,
    /// Id of the user the entry relates to, if any
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
