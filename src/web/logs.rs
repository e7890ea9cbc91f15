//! Backend log screen (read-only)
//!
//! The only screen whose filters go to the backend: `level` and `user` are
//! passed straight through as query parameters, alongside page/limit. The
//! text filter still runs console-side over the fetched page.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::ListParams;
use crate::services::filter;
use crate::web::flash::IncomingFlash;
use crate::web::locale_or_default;
use crate::web::middleware::{evict_to_login, screen, AppState, CurrentSession};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_logs))
}

#[derive(Debug, Deserialize)]
pub struct LogListQuery {
    #[serde(default)]
    pub q: String,
    pub level: Option<String>,
    pub user: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

async fn list_logs(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<LogListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);
    let params = ListParams::paged(query.page.or(Some(1)), query.limit.or(Some(50)))
        .with_filter("level", query.level.as_deref())
        .with_filter("user", query.user.as_deref());

    let outcome = match state
        .snapshots
        .load(&state.backend, session.token(), &resources::LOGS, &params)
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let rows = filter::filter_rows(outcome.rows, &query.q);

    let mut context = TeraContext::new();
    context.insert("logs", &rows);
    context.insert("q", &query.q);
    context.insert("level", &query.level);
    context.insert("user", &query.user);
    context.insert("page", &query.page.unwrap_or(1));
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "logs.html", context, flash)
}
