//! Shared web-layer plumbing: application state, the session extractor and
//! the redirect/response helpers every screen uses.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::sync::Arc;
use tera::Context as TeraContext;

use crate::backend::{BackendClient, ClientError};
use crate::config::Config;
use crate::services::SnapshotStore;
use crate::session::{self, AdminSession};
use crate::web::flash::{self, Flash};
use crate::web::render::Renderer;
use crate::web::{locale_or_default, NAV};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<BackendClient>,
    pub snapshots: SnapshotStore,
    pub renderer: Arc<Renderer>,
}

/// Extractor requiring a live session; requests without one are redirected
/// to the locale's login page.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AdminSession);

impl CurrentSession {
    pub fn token(&self) -> &str {
        &self.0.token
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match AdminSession::from_headers(&parts.headers) {
            Some(session) => Ok(Self(session)),
            None => Err(evict_to_login(locale_of_path(parts.uri.path()))),
        }
    }
}

/// First path segment when it names a supported locale, default otherwise.
pub fn locale_of_path(path: &str) -> &'static str {
    let candidate = path.split('/').find(|s| !s.is_empty()).unwrap_or_default();
    locale_or_default(candidate)
}

/// Evict the stored token and send the browser to the login page.
pub fn evict_to_login(locale: &str) -> Response {
    let mut response = Redirect::to(&format!("/{}/login", locale)).into_response();
    append_cookie(&mut response, &session::clear_cookie());
    response
}

/// Redirect carrying a flash cookie for the target page to show.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(to).into_response();
    append_cookie(&mut response, &flash.cookie());
    response
}

/// Uniform mutation failure handling: 401 evicts the session, everything
/// else flashes the message and returns to `back` with the screen unchanged.
pub fn fail(locale: &str, back: &str, error: ClientError) -> Response {
    if error.is_unauthorized() {
        return evict_to_login(locale);
    }
    redirect_with_flash(back, Flash::error(error.user_message()))
}

/// Render a screen template with the base context (locale, nav, flash).
/// A consumed flash cookie is cleared on the way out.
pub fn screen(
    state: &AppState,
    locale: &str,
    template: &str,
    mut context: TeraContext,
    flash: Option<Flash>,
) -> Response {
    context.insert("locale", &locale);
    context.insert("nav", &*NAV);
    let had_flash = flash.is_some();
    if let Some(flash) = flash {
        context.insert("flash", &flash);
    }

    match state.renderer.render(template, &context) {
        Ok(html) => {
            let mut response = Html(html).into_response();
            if had_flash {
                append_cookie(&mut response, &flash::clear_cookie());
            }
            response
        }
        Err(e) => {
            tracing::error!(template, error = %e, "Template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template rendering failed").into_response()
        }
    }
}

fn append_cookie(response: &mut Response, cookie: &str) {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_of_path_recognizes_supported_locales() {
        assert_eq!(locale_of_path("/fr/admin/users"), "fr");
        assert_eq!(locale_of_path("/de/admin/users"), "en");
        assert_eq!(locale_of_path("/"), "en");
    }

    #[test]
    fn eviction_clears_the_session_cookie() {
        let response = evict_to_login("fr");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/fr/login");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("k360_session=;"));
    }
}
