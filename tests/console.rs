//! End-to-end console flows against a stub backend
//!
//! The stub is a second axum app bound to an ephemeral port, standing in
//! for the remote K360 backend: it issues a fixed bearer token at login,
//! enforces it on every admin call and counts list fetches so the tests
//! can pin down the refetch behavior.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use k360_admin::backend::BackendClient;
use k360_admin::config::Config;
use k360_admin::services::SnapshotStore;
use k360_admin::web::{self, AppState, Renderer};

const TOKEN: &str = "test-token";
const EMAIL: &str = "admin@k360.app";
const PASSWORD: &str = "secret-password";

#[derive(Clone, Default)]
struct StubState {
    user_list_calls: Arc<AtomicUsize>,
    user_creates: Arc<AtomicUsize>,
    fail_user_list: Arc<AtomicBool>,
    media_uploads: Arc<AtomicUsize>,
    /// (field names in order, file name, file byte count) of the last upload
    media_received: Arc<Mutex<Option<(Vec<String>, Option<String>, usize)>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

async fn stub_login(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn stub_list_users(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_user_list.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "backend exploded" })),
        )
            .into_response();
    }
    state.user_list_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "data": [
            { "_id": "u1", "name": "Alpha", "email": "alpha@example.com", "role": "admin", "status": "active", "plan": "premium" },
            { "_id": "u2", "name": "Beta", "email": "beta@example.com", "status": "blocked" },
            { "_id": "u3", "name": "Gamma", "email": "gamma@example.com", "status": "active" }
        ],
        "total": 3
    }))
    .into_response()
}

async fn stub_create_user(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.user_creates.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::CREATED,
        Json(json!({ "_id": "u9", "name": body["name"], "email": body["email"] })),
    )
        .into_response()
}

async fn stub_list_media(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "data": [
            { "_id": "m1", "name": "Rain sounds", "type": "audio", "url": "http://cdn.test/rain.mp3" }
        ],
        "total": 1
    }))
    .into_response()
}

async fn stub_upload_media(
    State(state): State<StubState>,
    headers: HeaderMap,
    mut multipart: axum::extract::Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut fields = Vec::new();
    let mut file_name = None;
    let mut file_len = 0;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = field.file_name().map(|f| f.to_string());
            file_len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        } else {
            let _ = field.text().await;
        }
        fields.push(name);
    }

    if !fields.iter().any(|f| f == "file") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "file part missing" })),
        )
            .into_response();
    }

    state.media_uploads.fetch_add(1, Ordering::SeqCst);
    *state.media_received.lock().unwrap() = Some((fields, file_name, file_len));
    (StatusCode::CREATED, Json(json!({ "_id": "m9" }))).into_response()
}

async fn stub_dashboard(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "totalUsers": 4,
        "premiumUsers": 1,
        "activeSubscriptions": 2,
        "totalVideos": 7,
        "totalSequences": 3,
        "totalMedia": 12
    }))
    .into_response()
}

/// Spin up the stub backend on an ephemeral port, returning its base URL.
async fn spawn_stub(state: StubState) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(stub_login))
        .route("/api/admin/users", get(stub_list_users).post(stub_create_user))
        .route("/api/admin/media", get(stub_list_media).post(stub_upload_media))
        .route("/api/admin/dashboard/stats", get(stub_dashboard))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// Build the console pointed at the given stub backend.
fn console(backend_url: String) -> TestServer {
    let mut config = Config::default();
    config.backend.base_url = backend_url;
    config.backend.timeout_secs = 5;

    let backend = BackendClient::new(&config.backend).unwrap();
    let state = AppState {
        config: Arc::new(config),
        backend: Arc::new(backend),
        snapshots: SnapshotStore::new(&Default::default()),
        renderer: Arc::new(Renderer::new("templates").unwrap()),
    };
    TestServer::new(web::build_router(state)).unwrap()
}

fn session_cookie() -> HeaderValue {
    HeaderValue::from_static("k360_session=test-token")
}

#[tokio::test]
async fn login_mirrors_backend_token_into_the_session_cookie() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .post("/en/login")
        .form(&[("email", EMAIL), ("password", PASSWORD)])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/en/admin/dashboard");
    let cookie = response.header(header::SET_COOKIE);
    assert!(cookie.to_str().unwrap().starts_with("k360_session=test-token"));
}

#[tokio::test]
async fn bad_credentials_stay_on_the_login_page() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .post("/en/login")
        .form(&[("email", EMAIL), ("password", "wrong-password")])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/en/login");
    // flash carries the backend's message, no session cookie is set
    let cookie = response.header(header::SET_COOKIE).to_str().unwrap().to_string();
    assert!(cookie.starts_with("k360_flash=error:"));
    assert!(cookie.contains("Invalid%20credentials"));
}

#[tokio::test]
async fn list_screen_renders_fetched_rows() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .get("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Alpha"));
    assert!(html.contains("Beta"));
    assert!(html.contains("Gamma"));
}

#[tokio::test]
async fn global_text_filter_runs_over_fetched_rows() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .get("/en/admin/users")
        .add_query_param("q", "alp")
        .add_header(header::COOKIE, session_cookie())
        .await;

    let html = response.text();
    assert!(html.contains("Alpha"));
    assert!(!html.contains("Beta"));
    assert!(!html.contains("Gamma"));
}

#[tokio::test]
async fn successful_mutation_refetches_exactly_once() {
    let stub = StubState::default();
    let server = console(spawn_stub(stub.clone()).await);

    // the mutation itself does not refetch
    let response = server
        .post("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .form(&[
            ("name", "New User"),
            ("email", "new@example.com"),
            ("password", "longenough"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/en/admin/users");
    assert_eq!(stub.user_creates.load(Ordering::SeqCst), 1);
    assert_eq!(stub.user_list_calls.load(Ordering::SeqCst), 0);

    // following the redirect is the one and only refetch
    server
        .get("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .await;
    assert_eq!(stub.user_list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn console_side_validation_never_reaches_the_backend() {
    let stub = StubState::default();
    let server = console(spawn_stub(stub.clone()).await);

    let response = server
        .post("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .form(&[
            ("name", "New User"),
            ("email", "new@example.com"),
            ("password", "short"),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let cookie = response.header(header::SET_COOKIE).to_str().unwrap().to_string();
    assert!(cookie.starts_with("k360_flash=error:"));
    assert!(cookie.contains("password"));
    assert_eq!(stub.user_creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_refetch_preserves_previous_rows() {
    let stub = StubState::default();
    let server = console(spawn_stub(stub.clone()).await);

    // first load succeeds and fills the snapshot
    server
        .get("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .await;

    stub.fail_user_list.store(true, Ordering::SeqCst);

    let response = server
        .get("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    // error surfaced, previously rendered rows still there
    assert!(html.contains("backend exploded"));
    assert!(html.contains("Alpha"));
    assert!(html.contains("previously loaded rows"));
}

#[tokio::test]
async fn http_401_evicts_the_token_and_redirects_to_login() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .get("/en/admin/users")
        .add_header(
            header::COOKIE,
            HeaderValue::from_static("k360_session=stale-token"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/en/login");
    let cookie = response.header(header::SET_COOKIE).to_str().unwrap().to_string();
    assert!(cookie.starts_with("k360_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn missing_session_redirects_without_calling_the_backend() {
    let stub = StubState::default();
    let server = console(spawn_stub(stub.clone()).await);

    let response = server.get("/fr/admin/users").await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/fr/login");
    assert_eq!(stub.user_list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bare_paths_redirect_permanently_to_the_default_locale() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header(header::LOCATION), "/en/admin/dashboard");

    let response = server.get("/login").await;
    assert_eq!(response.status_code(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header(header::LOCATION), "/en/login");
}

#[tokio::test]
async fn dashboard_formats_server_computed_numbers() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .get("/en/admin/dashboard")
        .add_header(header::COOKIE, session_cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    // 1 of 4 premium, 2 of 4 subscribed
    assert!(html.contains("25%"));
    assert!(html.contains("50%"));
    assert!(html.contains("7"));
}

#[tokio::test]
async fn user_edit_forms_preselect_the_current_role_and_status() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .get("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .await;

    let html = response.text();
    // an untouched save must not demote Alpha or unblock Beta
    assert!(html.contains(r#"<option value="admin" selected"#));
    assert!(html.contains(r#"<option value="blocked" selected"#));
}

#[tokio::test]
async fn media_edit_form_preselects_the_asset_type() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .get("/en/admin/media")
        .add_header(header::COOKIE, session_cookie())
        .await;

    let html = response.text();
    assert!(html.contains("Rain sounds"));
    assert!(html.contains(r#"<option value="audio" selected"#));
}

#[tokio::test]
async fn media_upload_forwards_the_file_part() {
    let stub = StubState::default();
    let server = console(spawn_stub(stub.clone()).await);

    let form = MultipartForm::new()
        .add_text("name", "Rain sounds")
        .add_text("type", "audio")
        .add_part(
            "file",
            Part::bytes(b"fake-audio-bytes".as_slice()).file_name("rain.mp3"),
        );
    let response = server
        .post("/en/admin/media")
        .add_header(header::COOKIE, session_cookie())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/en/admin/media");
    let cookie = response.header(header::SET_COOKIE).to_str().unwrap().to_string();
    assert!(cookie.starts_with("k360_flash=success:"));

    assert_eq!(stub.media_uploads.load(Ordering::SeqCst), 1);
    let (fields, file_name, file_len) = stub.media_received.lock().unwrap().clone().unwrap();
    assert_eq!(fields, ["name", "type", "file"]);
    assert_eq!(file_name.as_deref(), Some("rain.mp3"));
    assert_eq!(file_len, b"fake-audio-bytes".len());
}

#[tokio::test]
async fn upload_without_a_file_never_reaches_the_backend() {
    let stub = StubState::default();
    let server = console(spawn_stub(stub.clone()).await);

    let form = MultipartForm::new()
        .add_text("name", "Rain sounds")
        .add_text("type", "audio");
    let response = server
        .post("/en/admin/media")
        .add_header(header::COOKIE, session_cookie())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let cookie = response.header(header::SET_COOKIE).to_str().unwrap().to_string();
    assert!(cookie.starts_with("k360_flash=error:"));
    assert!(cookie.contains("file"));
    assert_eq!(stub.media_uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn logout_purges_the_session_snapshots() {
    let stub = StubState::default();
    let server = console(spawn_stub(stub.clone()).await);

    // fill the snapshot, then log out with the same token
    server
        .get("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .await;
    server
        .post("/en/logout")
        .add_header(header::COOKIE, session_cookie())
        .await;

    stub.fail_user_list.store(true, Ordering::SeqCst);

    // no previous rows survive for this token after logout
    let response = server
        .get("/en/admin/users")
        .add_header(header::COOKIE, session_cookie())
        .await;
    let html = response.text();
    assert!(html.contains("backend exploded"));
    assert!(!html.contains("Alpha"));
    assert!(!html.contains("previously loaded rows"));
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let server = console(spawn_stub(StubState::default()).await);

    let response = server
        .post("/en/logout")
        .add_header(header::COOKIE, session_cookie())
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/en/login");
    let cookie = response.header(header::SET_COOKIE).to_str().unwrap().to_string();
    assert!(cookie.starts_with("k360_session=;"));
}
