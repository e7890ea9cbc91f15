//! User model
//!
//! Mirrors the backend's mobile-app user record for the user management
//! screen. Passwords never round-trip: the create form sends one, the backend
//! never returns one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered user of the K360 mobile app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Role within the app
    #[serde(default)]
    pub role: UserRole,
    /// Account status
    #[serde(default)]
    pub status: UserStatus,
    /// Current subscription plan name, if any
    #[serde(default)]
    pub plan: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// User role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Console operator
    Admin,
    /// Regular mobile-app user
    #[default]
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Blocked,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Blocked => write!(f, "blocked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_shape() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u1","name":"Ada","email":"ada@example.com","role":"admin","status":"active","plan":"premium"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.is_admin());
        assert!(user.is_active());
        assert_eq!(user.plan.as_deref(), Some("premium"));
    }

    #[test]
    fn missing_optional_fields_default() {
        let user: User =
            serde_json::from_str(r#"{"_id":"u2","name":"Eve","email":"eve@example.com"}"#).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.plan.is_none());
        assert!(user.created_at.is_none());
    }
}
