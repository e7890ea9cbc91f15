//! Dashboard screen
//!
//! All numbers come pre-computed from `/admin/dashboard/stats`; the console
//! only derives the percentage splits for the chart widgets.

use axum::extract::{Path, State};
use axum::response::Response;
use tera::Context as TeraContext;

use crate::backend::resources::DASHBOARD_STATS_PATH;
use crate::models::DashboardStats;
use crate::services::format::percent;
use crate::web::flash::IncomingFlash;
use crate::web::locale_or_default;
use crate::web::middleware::{evict_to_login, screen, AppState, CurrentSession};

/// GET /{locale}/admin/dashboard
pub async fn show(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
) -> Response {
    let locale = locale_or_default(&locale);

    let (stats, error) = match state
        .backend
        .get_json::<DashboardStats>(session.token(), DASHBOARD_STATS_PATH, &[])
        .await
    {
        Ok(stats) => (stats, None),
        Err(e) if e.is_unauthorized() => return evict_to_login(locale),
        Err(e) => (DashboardStats::default(), Some(e.user_message())),
    };

    let mut context = TeraContext::new();
    context.insert("premium_pct", &percent(stats.premium_users, stats.total_users));
    context.insert(
        "subscribed_pct",
        &percent(stats.active_subscriptions, stats.total_users),
    );
    context.insert("stats", &stats);
    context.insert("error", &error);
    screen(&state, locale, "dashboard.html", context, flash)
}
