//! Subscription and gift-code models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A paid subscription of one mobile-app user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning user id
    pub user: String,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Monthly => write!(f, "monthly"),
            Plan::Yearly => write!(f, "yearly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Canceled,
    Expired,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Canceled => write!(f, "canceled"),
            SubscriptionStatus::Expired => write!(f, "expired"),
        }
    }
}

/// A prepaid subscription code transferable between users.
///
/// Codes are generated server-side; the console only chooses plan and
/// duration when creating one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    #[serde(rename = "_id")]
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub plan: Plan,
    /// Prepaid duration in days
    #[serde(default)]
    pub duration_days: u32,
    /// Id of the user who redeemed the code, if anyone has
    #[serde(default)]
    pub redeemed_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Gift {
    pub fn is_redeemed(&self) -> bool {
        self.redeemed_by.is_some()
    }
}
