//! Flash messages - the console's toasts
//!
//! A mutation handler sets a short-lived cookie on its redirect; the next
//! page render shows the message once and clears the cookie. Nothing is
//! stored server-side.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use std::convert::Infallible;

use crate::session::cookie_value;

/// Name of the flash cookie.
pub const FLASH_COOKIE: &str = "k360_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One transient message shown on the next rendered page.
#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Set-Cookie value carrying this flash to the next request.
    pub fn cookie(&self) -> String {
        let kind = match self.kind {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        };
        format!(
            "{}={}:{}; Path=/; SameSite=Lax",
            FLASH_COOKIE,
            kind,
            urlencoding::encode(&self.message)
        )
    }

    fn decode(raw: &str) -> Option<Self> {
        let (kind, message) = raw.split_once(':')?;
        let message = urlencoding::decode(message).ok()?.into_owned();
        match kind {
            "success" => Some(Self::success(message)),
            "error" => Some(Self::error(message)),
            _ => None,
        }
    }
}

/// Set-Cookie value that clears a consumed flash.
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; SameSite=Lax; Max-Age=0", FLASH_COOKIE)
}

/// Extractor for an inbound flash cookie. Infallible: no cookie, no flash.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Option<Flash>);

impl<S: Send + Sync> FromRequestParts<S> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let flash = cookie_value(&parts.headers, FLASH_COOKIE)
            .as_deref()
            .and_then(Flash::decode);
        Ok(Self(flash))
    }
}
