//! Step management screen
//!
//! Steps render grouped under their parent session. The create/edit forms
//! offer the media library for the step's asset reference and take the
//! duration in seconds (templates show it through the `duration` filter).

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::{ListParams, Media, Session, Step};
use crate::services::grouping::steps_by_session;
use crate::services::listing::typed_rows;
use crate::services::{filter, validate};
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::locale_or_default;
use crate::web::middleware::{
    evict_to_login, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::STEPS,
    entity: "step",
    slug: "steps",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_steps).post(create_step))
        .route("/{id}/update", post(update_step))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_step))
}

#[derive(Debug, Deserialize)]
pub struct StepListQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct StepForm {
    pub name: String,
    /// Parent session id
    pub session: String,
    #[serde(default)]
    pub order: Option<i64>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u64>,
    /// Referenced media asset id
    #[serde(default)]
    pub media: Option<String>,
}

async fn list_steps(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<StepListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);
    let token = session.token();

    let sessions = match state
        .snapshots
        .load(&state.backend, token, &resources::SESSIONS, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };
    let steps = match state
        .snapshots
        .load(&state.backend, token, &resources::STEPS, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };
    let media = match state
        .snapshots
        .load(&state.backend, token, &resources::MEDIA, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let error = sessions
        .error
        .clone()
        .or(steps.error.clone())
        .or(media.error.clone());
    let stale = sessions.stale || steps.stale || media.stale;

    let step_rows = filter::filter_rows(steps.rows, &query.q);
    let groups = steps_by_session(
        typed_rows::<Session>(&sessions.rows),
        typed_rows::<Step>(&step_rows),
    );

    let mut context = TeraContext::new();
    context.insert("groups", &groups);
    context.insert("sessions", &typed_rows::<Session>(&sessions.rows));
    context.insert("media", &typed_rows::<Media>(&media.rows));
    context.insert("q", &query.q);
    context.insert("error", &error);
    context.insert("stale", &stale);
    screen(&state, locale, "steps.html", context, flash)
}

fn step_body(form: &StepForm) -> serde_json::Value {
    json!({
        "name": form.name.trim(),
        "session": form.session,
        "order": form.order.unwrap_or(1),
        "duration": form.duration.unwrap_or(0),
        "media": form.media.as_deref().filter(|m| !m.is_empty()),
    })
}

async fn create_step(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    Form(form): Form<StepForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::require("session", &form.session))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::create(&state, &session, locale, &DEF, &step_body(&form)).await
}

async fn update_step(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<StepForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::require("session", &form.session))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::update(&state, &session, locale, &DEF, &id, &step_body(&form)).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn delete_step(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
