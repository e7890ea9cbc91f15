//! Media library screen
//!
//! Upload goes through multipart straight to the backend's file store; the
//! console buffers the file and forwards it without touching disk. Metadata
//! edits and deletes are plain JSON calls.

use axum::extract::{Multipart, Path, Query, State};
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
    evict_to_login, fail, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::MEDIA,
    entity: "media asset",
    slug: "media",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_media).post(upload_media))
        .route("/{id}/update", post(update_media))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_media))
}

#[derive(Debug, Deserialize)]
pub struct MediaListQuery {
    #[serde(default)]
    pub q: String,
    /// Domain filter on the asset type
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMediaForm {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

async fn list_media(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<MediaListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);

    let outcome = match state
        .snapshots
        .load(&state.backend, session.token(), &resources::MEDIA, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let rows = filter::filter_rows(outcome.rows, &query.q);
    let rows = filter::retain_field(rows, "type", query.kind.as_deref());

    let mut context = TeraContext::new();
    context.insert("media", &rows);
    context.insert("q", &query.q);
    context.insert("kind", &query.kind);
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "media.html", context, flash)
}

/// POST /{locale}/admin/media - multipart upload
async fn upload_media(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let locale = locale_or_default(&locale);
    let back = DEF.list_path(locale);

    let mut name = String::new();
    let mut kind = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = field.text().await.unwrap_or_default(),
            "type" => kind = field.text().await.unwrap_or_default(),
            "file" => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                if let Ok(bytes) = field.bytes().await {
                    file = Some((filename, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    if let Err(e) = validate::require("name", &name) {
        return redirect_with_flash(&back, Flash::error(e.user_message()));
    }
    let Some((filename, bytes)) = file else {
        return redirect_with_flash(&back, Flash::error("file: is required"));
    };

    let form = reqwest::multipart::Form::new()
        .text("name", name)
        .text("type", kind)
        .part(
            "file",
            reqwest::multipart::Part::bytes(bytes).file_name(filename),
        );

    match state
        .backend
        .upload(session.token(), &resources::MEDIA, form)
        .await
    {
        Ok(_) => redirect_with_flash(&back, Flash::success("Media asset uploaded")),
        Err(e) => fail(locale, &back, e),
    }
}

async fn update_media(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<UpdateMediaForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("name", &form.name) {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    let body = json!({
        "name": form.name.trim(),
        "type": form.kind.as_deref().unwrap_or("image"),
    });
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

async fn delete_media(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
