//! Dashboard statistics model
//!
//! All numbers are computed server-side; the console only formats them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_subscriptions: u64,
    #[serde(default)]
    pub total_videos: u64,
    #[serde(default)]
    pub total_sequences: u64,
    #[serde(default)]
    pub total_media: u64,
    /// Users currently on a paid plan
    #[serde(default)]
    pub premium_users: u64,
}
