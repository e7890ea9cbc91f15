//! Subscription screen
//!
//! List with plan/status domain filters; the only mutation is cancelling a
//! subscription, which goes through the usual confirmation page.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::ListParams;
use crate::services::filter;
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::IncomingFlash;
use crate::web::locale_or_default;
use crate::web::middleware::{evict_to_login, screen, AppState, CurrentSession};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::SUBSCRIPTIONS,
    entity: "subscription",
    slug: "subscriptions",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions))
        .route("/{id}/confirm-delete", get(confirm_cancel))
        .route("/{id}/delete", post(cancel_subscription))
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionListQuery {
    #[serde(default)]
    pub q: String,
    pub plan: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

async fn list_subscriptions(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<SubscriptionListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);
    let params = ListParams::paged(query.page, query.limit);

    let outcome = match state
        .snapshots
        .load(
            &state.backend,
            session.token(),
            &resources::SUBSCRIPTIONS,
            &params,
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let rows = filter::filter_rows(outcome.rows, &query.q);
    let rows = filter::retain_field(rows, "plan", query.plan.as_deref());
    let rows = filter::retain_field(rows, "status", query.status.as_deref());

    let mut context = TeraContext::new();
    context.insert("subscriptions", &rows);
    context.insert("q", &query.q);
    context.insert("plan", &query.plan);
    context.insert("status", &query.status);
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "subscriptions.html", context, flash)
}

async fn confirm_cancel(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn cancel_subscription(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
