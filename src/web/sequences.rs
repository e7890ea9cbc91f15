//! Sequence management screen
//!
//! Sequences render grouped under their cycle phase (accordion view). Two
//! full lists are fetched and regrouped from scratch on every load; the
//! create form under each phase comes pre-filled with `max(order) + 1` of
//! that phase's sequences.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::{CyclePhase, ListParams, Sequence};
use crate::services::grouping::sequences_by_phase;
use crate::services::listing::typed_rows;
use crate::services::{filter, validate};
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::locale_or_default;
use crate::web::middleware::{
    evict_to_login, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::SEQUENCES,
    entity: "sequence",
    slug: "sequences",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sequences).post(create_sequence))
        .route("/{id}/update", post(update_sequence))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_sequence))
}

#[derive(Debug, Deserialize)]
pub struct SequenceListQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SequenceForm {
    pub name: String,
    /// Parent cycle phase id
    #[serde(rename = "cyclePhase")]
    pub cycle_phase: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

async fn list_sequences(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<SequenceListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);
    let token = session.token();

    let phases = match state
        .snapshots
        .load(&state.backend, token, &resources::CYCLE_PHASES, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };
    let sequences = match state
        .snapshots
        .load(&state.backend, token, &resources::SEQUENCES, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let error = phases.error.clone().or(sequences.error.clone());
    let stale = phases.stale || sequences.stale;

    let sequence_rows = filter::filter_rows(sequences.rows, &query.q);
    let groups = sequences_by_phase(
        typed_rows::<CyclePhase>(&phases.rows),
        typed_rows::<Sequence>(&sequence_rows),
    );

    let mut context = TeraContext::new();
    context.insert("groups", &groups);
    context.insert("phases", &typed_rows::<CyclePhase>(&phases.rows));
    context.insert("q", &query.q);
    context.insert("error", &error);
    context.insert("stale", &stale);
    screen(&state, locale, "sequences.html", context, flash)
}

fn sequence_body(form: &SequenceForm) -> serde_json::Value {
    json!({
        "name": form.name.trim(),
        "cyclePhase": form.cycle_phase,
        "order": form.order.unwrap_or(1),
        "description": form.description.as_deref().unwrap_or_default(),
    })
}

async fn create_sequence(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    Form(form): Form<SequenceForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::require("cycle phase", &form.cycle_phase))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::create(&state, &session, locale, &DEF, &sequence_body(&form)).await
}

async fn update_sequence(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<SequenceForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::require("cycle phase", &form.cycle_phase))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::update(&state, &session, locale, &DEF, &id, &sequence_body(&form)).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn delete_sequence(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
