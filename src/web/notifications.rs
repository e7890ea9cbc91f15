//! Notification screen
//!
//! Talks to the backend's non-admin `/notifications` surface, the one
//! collection without the `/admin` prefix.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::ListParams;
use crate::services::{filter, validate};
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::locale_or_default;
use crate::web::middleware::{
    evict_to_login, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::NOTIFICATIONS,
    entity: "notification",
    slug: "notifications",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/{id}/update", post(update_notification))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_notification))
}

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct NotificationForm {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// RFC 3339 timestamp; empty means "send immediately"
    #[serde(rename = "scheduledAt", default)]
    pub scheduled_at: Option<String>,
}

async fn list_notifications(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<NotificationListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);

    let outcome = match state
        .snapshots
        .load(
            &state.backend,
            session.token(),
            &resources::NOTIFICATIONS,
            &ListParams::all(),
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let rows = filter::filter_rows(outcome.rows, &query.q);

    let mut context = TeraContext::new();
    context.insert("notifications", &rows);
    context.insert("q", &query.q);
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "notifications.html", context, flash)
}

fn notification_body(form: &NotificationForm) -> serde_json::Value {
    json!({
        "title": form.title.trim(),
        "body": form.body.as_deref().unwrap_or_default(),
        "scheduledAt": form.scheduled_at.as_deref().filter(|s| !s.is_empty()),
    })
}

async fn create_notification(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    Form(form): Form<NotificationForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("title", &form.title) {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::create(&state, &session, locale, &DEF, &notification_body(&form)).await
}

async fn update_notification(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<NotificationForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("title", &form.title) {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::update(&state, &session, locale, &DEF, &id, &notification_body(&form)).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn delete_notification(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
