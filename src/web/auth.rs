//! Login and logout screens
//!
//! Authentication is delegated: credentials go straight through to the
//! backend's login endpoint and the returned bearer token is mirrored into
//! the session cookie. The console never stores credentials.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tera::Context as TeraContext;

use crate::services::validate;
use crate::session::{self, AdminSession};
use crate::web::flash::{Flash, IncomingFlash};
use crate::web::middleware::{redirect_with_flash, screen, AppState};
use crate::web::locale_or_default;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// GET /{locale}/login
pub async fn login_page(
    State(state): State<AppState>,
    IncomingFlash(flash): IncomingFlash,
    Path(locale): Path<String>,
) -> Response {
    let locale = locale_or_default(&locale);
    screen(&state, locale, "login.html", TeraContext::new(), flash)
}

/// POST /{locale}/login
pub async fn login_submit(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    axum::Form(form): axum::Form<LoginForm>,
) -> Response {
    let locale = locale_or_default(&locale);
    let login_path = format!("/{}/login", locale);

    if let Err(e) = validate::email("email", &form.email)
        .and_then(|_| validate::require("password", &form.password))
    {
        return redirect_with_flash(&login_path, Flash::error(e.user_message()));
    }

    match state.backend.login(&form.email, &form.password).await {
        Ok(response) => {
            tracing::info!("Admin login succeeded");
            let mut redirect =
                Redirect::to(&format!("/{}/admin/dashboard", locale)).into_response();
            if let Ok(cookie) = HeaderValue::from_str(&session::store_cookie(&response.token)) {
                redirect.headers_mut().append(header::SET_COOKIE, cookie);
            }
            redirect
        }
        // Already on the login page: a 401 here means bad credentials, not
        // an expired session, so no eviction dance.
        Err(e) => redirect_with_flash(&login_path, Flash::error(e.user_message())),
    }
}

/// POST /{locale}/logout
pub async fn logout(
    State(state): State<AppState>,
    Path(locale): Path<String>,
    headers: HeaderMap,
) -> Response {
    let locale = locale_or_default(&locale);
    if let Some(active) = AdminSession::from_headers(&headers) {
        state.snapshots.forget_session(&active.token);
    }

    let mut response = Redirect::to(&format!("/{}/login", locale)).into_response();
    if let Ok(cookie) = HeaderValue::from_str(&session::clear_cookie()) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
