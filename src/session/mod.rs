//! Session handling: the bridge between the backend's bearer tokens and the
//! browser
//!
//! The backend issues a bearer token at login; the console mirrors it into
//! an HttpOnly cookie and reads it back on every request to authorize its
//! own backend calls. A 401 from any backend call evicts the cookie again.

use axum::http::{header, HeaderMap};

/// Name of the session cookie carrying the backend bearer token.
pub const SESSION_COOKIE: &str = "k360_session";

/// A live admin session: the request-scoped token every backend call uses.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
}

impl AdminSession {
    /// Extract the session from request headers: session cookie first, then
    /// a bearer Authorization header (useful for scripted access).
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
            return Some(Self { token });
        }

        let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = auth.strip_prefix("Bearer ")?;
        if token.is_empty() {
            return None;
        }
        Some(Self {
            token: token.to_string(),
        })
    }
}

/// Read one cookie value out of the Cookie header(s).
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(header::COOKIE) {
        let Ok(cookies) = header.to_str() else {
            continue;
        };
        for cookie in cookies.split(';') {
            if let Some((key, value)) = cookie.trim().split_once('=') {
                if key == name && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Set-Cookie value that stores the token for the browser session.
pub fn store_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    )
}

/// Set-Cookie value that evicts the stored token.
pub fn clear_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_token_from_cookie() {
        let headers = headers_with_cookie("theme=dark; k360_session=tok123");
        let session = AdminSession::from_headers(&headers).unwrap();
        assert_eq!(session.token, "tok123");
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok456"),
        );
        let session = AdminSession::from_headers(&headers).unwrap();
        assert_eq!(session.token, "tok456");
    }

    #[test]
    fn empty_cookie_means_no_session() {
        let headers = headers_with_cookie("k360_session=");
        assert!(AdminSession::from_headers(&headers).is_none());
        assert!(AdminSession::from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_cookie().contains("Max-Age=0"));
        assert!(store_cookie("t").starts_with("k360_session=t;"));
    }
}
