//! Data models for the K360 admin console
//!
//! Every entity here mirrors a record owned and validated by the remote K360
//! backend. The console never enforces their invariants; the structs exist so
//! screens and forms work with typed fields instead of loose JSON bags.

pub mod content;
pub mod cycle;
pub mod dashboard;
pub mod log;
pub mod media;
pub mod notification;
pub mod subscription;
pub mod user;

pub use content::{Sequence, Session, Step};
pub use cycle::{Cycle, CyclePhase};
pub use dashboard::DashboardStats;
pub use log::LogEntry;
pub use media::{Media, MediaKind, Video};
pub use notification::Notification;
pub use subscription::{Gift, Plan, Subscription, SubscriptionStatus};
pub use user::{User, UserRole, UserStatus};

/// Query parameters for backend list endpoints.
///
/// Most admin list endpoints accept `page`/`limit`; a few accept extra
/// filters which are passed straight through as query parameters.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    extra: Vec<(String, String)>,
}

impl ListParams {
    /// Unpaginated full-list fetch.
    pub fn all() -> Self {
        Self::default()
    }

    /// Paginated fetch.
    pub fn paged(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    /// Add a passthrough query parameter (skipped when the value is empty).
    pub fn with_filter(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            if !value.is_empty() {
                self.extra.push((key.to_string(), value.to_string()));
            }
        }
        self
    }

    /// Render as query pairs for the HTTP client.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query.extend(self.extra.iter().cloned());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_render_in_order() {
        let params = ListParams::paged(Some(2), Some(25))
            .with_filter("level", Some("error"))
            .with_filter("user", None)
            .with_filter("plan", Some(""));

        assert_eq!(
            params.to_query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("level".to_string(), "error".to_string()),
            ]
        );
    }

    #[test]
    fn full_list_has_no_query() {
        assert!(ListParams::all().to_query().is_empty());
    }
}
