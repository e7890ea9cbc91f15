//! Backend REST client
//!
//! The console's only external dependency: a thin, typed wrapper over the
//! K360 backend API. Every call carries `Authorization: Bearer <token>` with
//! a token passed in from the caller's session (never global state), sends
//! JSON bodies except for multipart uploads, and maps failures onto the
//! [`ClientError`] kinds.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::BackendConfig;

mod error;
pub mod resources;

pub use error::ClientError;
pub use resources::Resource;

/// HTTP client for the K360 backend API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

/// Response of the backend's admin login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token mirrored into the session cookie
    pub token: String,
}

/// Error body shape the backend uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange admin credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        decode(response).await
    }

    /// POST a JSON body, decode a JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send_json(Method::POST, token, path, body).await
    }

    /// PUT a JSON body, decode a JSON response.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send_json(Method::PUT, token, path, body).await
    }

    /// DELETE, ignoring any response body.
    pub async fn delete(&self, token: &str, path: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// POST a multipart form (uploads). No explicit Content-Type: reqwest
    /// sets the multipart boundary itself.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        token: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .request(method, self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

/// Map a non-2xx response to `ClientError::Http`, passing 2xx through.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Best effort: the backend answers errors with {"message": "..."}, but a
    // proxy in between may answer with anything.
    let message = match response.json::<ErrorBody>().await {
        Ok(ErrorBody { message: Some(m) }) => m,
        _ => status.canonical_reason().unwrap_or_default().to_string(),
    };

    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Decode a 2xx JSON body into `T`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Extract the row array from a list response.
///
/// Paginated endpoints answer `{"data": [...], "total": n}`, unpaginated ones
/// answer a bare array; both shapes flow through here.
pub fn rows_from(value: Value) -> Result<Vec<Value>, ClientError> {
    match value {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut object) => {
            for key in ["data", "items", "results", "docs"] {
                if let Some(Value::Array(rows)) = object.remove(key) {
                    return Ok(rows);
                }
            }
            Err(ClientError::Parse(
                "list response carries no row array".to_string(),
            ))
        }
        other => Err(ClientError::Parse(format!(
            "expected a list, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_from_accepts_bare_array() {
        let rows = rows_from(json!([{"_id": "a"}, {"_id": "b"}])).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn rows_from_accepts_data_envelope() {
        let rows = rows_from(json!({"data": [{"_id": "a"}], "total": 1, "page": 1})).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["_id"], "a");
    }

    #[test]
    fn rows_from_rejects_scalar() {
        let err = rows_from(json!(42)).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = BackendClient::new(&crate::config::BackendConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.url("/admin/users"), "http://localhost:5000/api/admin/users");
    }
}
