//! User management screen
//!
//! List with a global text filter plus status/plan domain filters, create
//! and edit forms, and a confirmed delete. All filtering runs over the rows
//! already fetched from the backend.

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
    resource: &resources::USERS,
    entity: "user",
    slug: "users",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}/update", post(update_user))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_user))
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    /// Global text filter
    #[serde(default)]
    pub q: String,
    pub status: Option<String>,
    pub plan: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

async fn list_users(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<UserListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);
    let params = ListParams::paged(query.page, query.limit);

    let outcome = match state
        .snapshots
        .load(&state.backend, session.token(), &resources::USERS, &params)
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let rows = filter::filter_rows(outcome.rows, &query.q);
    let rows = filter::retain_field(rows, "status", query.status.as_deref());
    let rows = filter::retain_field(rows, "plan", query.plan.as_deref());

    let mut context = TeraContext::new();
    context.insert("users", &rows);
    context.insert("q", &query.q);
    context.insert("status", &query.status);
    context.insert("plan", &query.plan);
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "users.html", context, flash)
}

async fn create_user(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    Form(form): Form<CreateUserForm>,
) -> Response {
    let locale = locale_or_default(&locale);

    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::email("email", &form.email))
        .and_then(|_| validate::password("password", &form.password))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }

    let body = json!({
        "name": form.name.trim(),
        "email": form.email.trim(),
        "password": form.password,
        "role": form.role.as_deref().unwrap_or("user"),
    });
    crud::create(&state, &session, locale, &DEF, &body).await
}

async fn update_user(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<UpdateUserForm>,
) -> Response {
    let locale = locale_or_default(&locale);

    if let Err(e) = validate::require("name", &form.name)
        .and_then(|_| validate::email("email", &form.email))
    {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }

    let mut body = json!({
        "name": form.name.trim(),
        "email": form.email.trim(),
    });
    if let Some(role) = form.role.as_deref() {
        body["role"] = json!(role);
    }
    if let Some(status) = form.status.as_deref() {
        body["status"] = json!(status);
    }
    crud::update(&state, &session, locale, &DEF, &id, &body).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    _session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::confirm_delete(&state, locale, &DEF, &id)
}

async fn delete_user(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
