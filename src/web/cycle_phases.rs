//! Cycle phase management screen

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::ListParams;
use crate::services::{filter, ordering, validate};
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::locale_or_default;
use crate::web::middleware::{
    evict_to_login, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::CYCLE_PHASES,
    entity: "cycle phase",
    slug: "cycle-phases",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_phases).post(create_phase))
        .route("/{id}/update", post(update_phase))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_phase))
}

#[derive(Debug, Deserialize)]
pub struct PhaseListQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct PhaseForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

async fn list_phases(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<PhaseListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);

    let outcome = match state
        .snapshots
        .load(
            &state.backend,
            session.token(),
            &resources::CYCLE_PHASES,
            &ListParams::all(),
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    // Suggested order for the create form, from the unfiltered list
    let next_order = ordering::next_order(
        outcome
            .rows
            .iter()
            .filter_map(|row| row.get("order").and_then(|o| o.as_i64())),
    );
    let rows = filter::filter_rows(outcome.rows, &query.q);

    let mut context = TeraContext::new();
    context.insert("phases", &rows);
    context.insert("q", &query.q);
    context.insert("next_order", &next_order);
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "cycle_phases.html", context, flash)
}

fn phase_body(form: &PhaseForm) -> serde_json::Value {
    json!({
        "name": form.name.trim(),
        "description": form.description.as_deref().unwrap_or_default(),
        "color": form.color.as_deref().unwrap_or_default(),
        "order": form.order.unwrap_or(1),
    })
}

async fn create_phase(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    Form(form): Form<PhaseForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name) {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::create(&state, &session, locale, &DEF, &phase_body(&form)).await
}

async fn update_phase(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<PhaseForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name) {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    crud::update(&state, &session, locale, &DEF, &id, &phase_body(&form)).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn delete_phase(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
