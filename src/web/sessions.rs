//! Session management screen
//!
//! Sessions render grouped under their parent sequence, one accordion
//! bucket per sequence, same shape as the sequences screen one level up.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::{ListParams, Sequence, Session};
use crate::services::grouping::sessions_by_sequence;
use crate::services::listing::typed_rows;
use crate::services::{filter, validate};
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::locale_or_default;
use crate::web::middleware::{
    evict_to_login, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::SESSIONS,
    entity: "session",
    slug: "sessions",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/{id}/update", post(update_session))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_session))
}

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionForm {
    pub name: String,
    /// Parent sequence id
    pub sequence: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

async fn list_sessions(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<SessionListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);
    let token = session.token();

    let sequences = match state
        .snapshots
        .load(&state.backend, token, &resources::SEQUENCES, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };
    let sessions = match state
        .snapshots
        .load(&state.backend, token, &resources::SESSIONS, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let error = sequences.error.clone().or(sessions.error.clone());
    let stale = sequences.stale || sessions.stale;

    let session_rows = filter::filter_rows(sessions.rows, &query.q);
    let groups = sessions_by_sequence(
        typed_rows::<Sequence>(&sequences.rows),
        typed_rows::<Session>(&session_rows),
    );

    let mut context = TeraContext::new();
    context.insert("groups", &groups);
    context.insert("sequences", &typed_rows::<Sequence>(&sequences.rows));
    context.insert("q", &query.q);
    context.insert("error", &error);
    context.insert("stale", &stale);
    screen(&state, locale, "sessions.html", context, flash)
}

fn session_body(form: &SessionForm) -> serde_json::Value {
    json!({
        "name": form.name.trim(),
        "sequence": form.sequence,
        "order": form.order.unwrap_or(1),
        "description": form.description.as_deref().unwrap_or_default(),
    })
}

async fn create_session(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    Form(form): Form<SessionForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::require("sequence", &form.sequence))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::create(&state, &session, locale, &DEF, &session_body(&form)).await
}

async fn update_session(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<SessionForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::require("sequence", &form.sequence))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::update(&state, &session, locale, &DEF, &id, &session_body(&form)).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn delete_session(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
