//! Web layer - screens and routing
//!
//! Every console path is locale-prefixed; bare paths redirect permanently
//! to the default locale. Each resource screen lives in its own module and
//! mounts under `/{locale}/admin/<screen>`.

pub mod auth;
pub mod crud;
pub mod cycle_phases;
pub mod cycles;
pub mod dashboard;
pub mod flash;
pub mod gifts;
pub mod logs;
pub mod media;
pub mod middleware;
pub mod notifications;
pub mod render;
pub mod sequences;
pub mod sessions;
pub mod steps;
pub mod subscriptions;
pub mod users;
pub mod videos;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use once_cell::sync::Lazy;
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub use middleware::AppState;
pub use render::Renderer;

/// Supported console locales; the first one is the default.
pub const LOCALES: &[&str] = &["en", "fr"];
pub const DEFAULT_LOCALE: &str = "en";

/// Resolve a path segment to a supported locale, falling back to the
/// default for anything unknown.
pub fn locale_or_default(candidate: &str) -> &'static str {
    LOCALES
        .iter()
        .find(|l| **l == candidate)
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// One sidebar entry.
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
    pub key: &'static str,
    pub label: &'static str,
    /// Path under `/{locale}`
    pub path: &'static str,
}

/// Sidebar navigation, one entry per screen.
pub static NAV: Lazy<Vec<NavEntry>> = Lazy::new(|| {
    vec![
        NavEntry { key: "dashboard", label: "Dashboard", path: "/admin/dashboard" },
        NavEntry { key: "users", label: "Users", path: "/admin/users" },
        NavEntry { key: "cycle-phases", label: "Cycle phases", path: "/admin/cycle-phases" },
        NavEntry { key: "sequences", label: "Sequences", path: "/admin/sequences" },
        NavEntry { key: "sessions", label: "Sessions", path: "/admin/sessions" },
        NavEntry { key: "steps", label: "Steps", path: "/admin/steps" },
        NavEntry { key: "media", label: "Media library", path: "/admin/media" },
        NavEntry { key: "videos", label: "Videos", path: "/admin/videos" },
        NavEntry { key: "logs", label: "Logs", path: "/admin/logs" },
        NavEntry { key: "cycles", label: "Cycles", path: "/admin/cycles" },
        NavEntry { key: "subscriptions", label: "Subscriptions", path: "/admin/subscriptions" },
        NavEntry { key: "gifts", label: "Gift codes", path: "/admin/gifts" },
        NavEntry { key: "notifications", label: "Notifications", path: "/admin/notifications" },
    ]
});

/// Build the locale-scoped screen router.
fn locale_router() -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(redirect_to_dashboard))
        .route("/dashboard", get(dashboard::show))
        .nest("/users", users::router())
        .nest("/cycle-phases", cycle_phases::router())
        .nest("/sequences", sequences::router())
        .nest("/sessions", sessions::router())
        .nest("/steps", steps::router())
        .nest("/media", media::router())
        .nest("/videos", videos::router())
        .nest("/logs", logs::router())
        .nest("/cycles", cycles::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/gifts", gifts::router())
        .nest("/notifications", notifications::router());

    Router::new()
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .nest("/admin", admin)
}

async fn redirect_to_dashboard(
    axum::extract::Path(locale): axum::extract::Path<String>,
) -> Redirect {
    Redirect::to(&format!("/{}/admin/dashboard", locale_or_default(&locale)))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Unlocalized paths redirect permanently to the default locale
        .route("/", get(|| async { root_redirect() }))
        .route("/login", get(|| async { Redirect::permanent(&format!("/{}/login", DEFAULT_LOCALE)) }))
        .route("/admin", get(|| async { root_redirect() }))
        .route("/admin/dashboard", get(|| async { root_redirect() }))
        .nest("/{locale}", locale_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn root_redirect() -> Redirect {
    Redirect::permanent(&format!("/{}/admin/dashboard", DEFAULT_LOCALE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locales_fall_back_to_default() {
        assert_eq!(locale_or_default("fr"), "fr");
        assert_eq!(locale_or_default("de"), "en");
        assert_eq!(locale_or_default(""), "en");
    }

    #[test]
    fn nav_covers_every_screen() {
        assert_eq!(NAV.len(), 13);
        assert!(NAV.iter().any(|e| e.path == "/admin/notifications"));
    }
}
