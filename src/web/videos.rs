//! Video management screen
//!
//! Upload sends the video file and its thumbnail in one multipart call.
//! The cycle-phase domain filter, like everywhere else, runs over rows the
//! screen already fetched.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tera::Context as TeraContext;

use crate::backend::resources;
use crate::models::{CyclePhase, ListParams};
use crate::services::listing::typed_rows;
use crate::services::{filter, validate};
use crate::web::crud::{self, ScreenDef};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::locale_or_default;
use crate::web::middleware::{
    evict_to_login, fail, redirect_with_flash, screen, AppState, CurrentSession,
};

const DEF: ScreenDef = ScreenDef {
    resource: &resources::VIDEOS,
    entity: "video",
    slug: "videos",
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(upload_video))
        .route("/{id}/update", post(update_video))
        .route("/{id}/confirm-delete", get(confirm_delete))
        .route("/{id}/delete", post(delete_video))
}

#[derive(Debug, Deserialize)]
pub struct VideoListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "cyclePhase")]
    pub cycle_phase: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoForm {
    pub title: String,
    #[serde(rename = "cyclePhase", default)]
    pub cycle_phase: Option<String>,
}

async fn list_videos(
    State(state): State<AppState>,
    session: CurrentSession,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
    Query(query): Query<VideoListQuery>,
) -> Response {
    let locale = locale_or_default(&locale);
    let token = session.token();

    let outcome = match state
        .snapshots
        .load(&state.backend, token, &resources::VIDEOS, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };
    // Phases feed the filter dropdown and the upload form
    let phases = match state
        .snapshots
        .load(&state.backend, token, &resources::CYCLE_PHASES, &ListParams::all())
        .await
    {
        Ok(outcome) => outcome,
        Err(_) => return evict_to_login(locale),
    };

    let rows = filter::filter_rows(outcome.rows, &query.q);
    let rows = filter::retain_field(rows, "cyclePhase", query.cycle_phase.as_deref());

    let mut context = TeraContext::new();
    context.insert("videos", &rows);
    context.insert("phases", &typed_rows::<CyclePhase>(&phases.rows));
    context.insert("q", &query.q);
    context.insert("cycle_phase", &query.cycle_phase);
    context.insert("error", &outcome.error);
    context.insert("stale", &outcome.stale);
    screen(&state, locale, "videos.html", context, flash)
}

/// POST /{locale}/admin/videos - multipart upload (video + thumbnail)
async fn upload_video(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(locale): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let locale = locale_or_default(&locale);
    let back = DEF.list_path(locale);

    let mut title = String::new();
    let mut cycle_phase = String::new();
    let mut video: Option<(String, Vec<u8>)> = None;
    let mut thumbnail: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "title" => title = field.text().await.unwrap_or_default(),
            "cyclePhase" => cycle_phase = field.text().await.unwrap_or_default(),
            "video" | "thumbnail" => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                if let Ok(bytes) = field.bytes().await {
                    let part = Some((filename, bytes.to_vec()));
                    if field_name == "video" {
                        video = part;
                    } else {
                        thumbnail = part;
                    }
                }
            }
            _ => {}
        }
    }

    if let Err(e) = validate::require("title", &title) {
        return redirect_with_flash(&back, Flash::error(e.user_message()));
    }
    let Some((video_name, video_bytes)) = video else {
        return redirect_with_flash(&back, Flash::error("video: is required"));
    };

    let mut form = reqwest::multipart::Form::new()
        .text("title", title)
        .text("cyclePhase", cycle_phase)
        .part(
            "video",
            reqwest::multipart::Part::bytes(video_bytes).file_name(video_name),
        );
    if let Some((thumb_name, thumb_bytes)) = thumbnail {
        form = form.part(
            "thumbnail",
            reqwest::multipart::Part::bytes(thumb_bytes).file_name(thumb_name),
        );
    }

    match state
        .backend
        .upload(session.token(), &resources::VIDEOS, form)
        .await
    {
        Ok(_) => redirect_with_flash(&back, Flash::success("Video uploaded")),
        Err(e) => fail(locale, &back, e),
    }
}

async fn update_video(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
    Form(form): Form<UpdateVideoForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Err(e) = validate::require("title", &form.title) {
        return redirect_with_flash(&DEF.list_path(locale), Flash::error(e.user_message()));
    }
    let body = json!({
        "title": form.title.trim(),
        "cyclePhase": form.cycle_phase.as_deref().filter(|p| !p.is_empty()),
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

async fn delete_video(
    State(state): State<AppState>,
    session: CurrentSession,
    Path((locale, id)): Path<(String, String)>,
) -> Response {
    let locale = locale_or_default(&locale);
    crud::delete(&state, &session, locale, &DEF, &id).await
}
