//! Cycle and cycle-phase models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named stage of the tracked biological cycle (menstrual, follicular,
/// ovulatory, luteal). Phases categorize all guided content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CyclePhase {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Accent color used by the mobile app, hex string
    #[serde(default)]
    pub color: Option<String>,
    /// Display order within the cycle
    #[serde(default)]
    pub order: i64,
}

/// One tracked cycle of one mobile-app user, read-only in the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning user id
    pub user: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Cycle length in days
    #[serde(default)]
    pub length: Option<u32>,
    /// Phase the user is currently in, if the backend resolved one
    #[serde(default)]
    pub current_phase: Option<String>,
}
