//! Gift code screen
//!
//! Gift codes are generated server-side; the create form only picks a plan
//! and a prepaid duration in days.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::ListParams;
use crate::services::filter;
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::locale_or_default;
use crate::web::middleware::{
    evict_to_login, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::GIFTS,
    entity: "gift code",
    slug: "gifts",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_gifts).post(create_gift))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_gift))
}

#[derive(Debug, Deserialize)]
pub struct GiftListQuery {
    #[serde(default)]
    pub q: String,
    pub plan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGiftForm {
    pub plan: String,
    #[serde(rename = "durationDays")]
    pub duration_days: Option<u32>,
}

async fn list_gifts(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<GiftListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);

    let outcome = match state
        .snapshots
        .load(&state.backend, session.token(), &resources::GIFTS, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let rows = filter::filter_rows(outcome.rows, &query.q);
    let rows = filter::retain_field(rows, "plan", query.plan.as_deref());

    let mut context = TeraContext::new();
    context.insert("gifts", &rows);
    context.insert("q", &query.q);
    context.insert("plan", &query.plan);
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "gifts.html", context, flash)
}

async fn create_gift(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    Form(form): Form<CreateGiftForm>,
) -> Response {
    let locale = locale_or_default(&locale);

    let duration_days = form.duration_days.unwrap_or(0);
    if duration_days == 0 {
        return redirect_with_flash(
            &DEF.list_path(locale),
            Flash::error("duration: must be at least one day"),
        );
    }

    let body = json!({
        "plan": form.plan,
        "durationDays": duration_days,
    });
    crud::create(&state, &session, locale, &DEF, &body).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn delete_gift(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
