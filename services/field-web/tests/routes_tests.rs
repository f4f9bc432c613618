//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use field_web::config::Config;
use field_web::html::{FORM_ERROR_MESSAGE, FORM_SUCCESS_MESSAGE};
use field_web::router::build_router;
use field_web::state::AppState;
use session::ValidationMode;
use storage::{FieldCatalog, MemoryFieldCatalog, MemoryTokenStore};
use test_utils::{ab_spreadsheet, empty_field_archive, field_archive, rar_bytes};

const BOUNDARY: &str = "----fieldwebtestboundary";

struct TestApp {
    router: Router,
    state: Arc<AppState>,
}

impl TestApp {
    async fn new(mode: ValidationMode, token: Option<&str>, initialize: bool) -> Self {
        let config = Config {
            session_validation: mode,
            ..Config::default()
        };
        let tokens = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let state = Arc::new(AppState::from_parts(
            config,
            Arc::new(MemoryFieldCatalog::new()),
            Arc::new(tokens),
            None,
        ));
        if initialize {
            state.gate.initialize().await.unwrap();
        }
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    async fn logged_in() -> Self {
        Self::new(ValidationMode::Strict, Some("admin"), true).await
    }

    async fn logged_out() -> Self {
        Self::new(ValidationMode::Strict, None, true).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, location, String::from_utf8_lossy(&bytes).to_string())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Option<String>, String) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn post_multipart(
        &self,
        uri: &str,
        parts: &[Part<'_>],
    ) -> (StatusCode, Option<String>, String) {
        self.send(
            Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(parts)))
                .unwrap(),
        )
        .await
    }
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, Vec<u8>),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn valid_parts() -> Vec<Part<'static>> {
    vec![
        Part::Text("title", "Rice Paddy"),
        Part::File("shapeFile", "plots.zip", field_archive()),
        Part::File("tableFile", "yield.xlsx", ab_spreadsheet()),
    ]
}

// ============================================================================
// Pages and chrome
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::logged_out().await;
    let (status, _, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");

    let (status, _, _) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_map_page_with_empty_catalog() {
    let app = TestApp::logged_out().await;
    let (status, _, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Mekong Project"));
    assert!(body.contains("Under Construction"));
    assert!(body.contains("Niigata University"));
    assert!(body.contains("No fields yet."));
    assert!(body.contains(r#"id="map-command""#));
}

// ============================================================================
// Session gate
// ============================================================================

#[tokio::test]
async fn test_guarded_route_while_pending_shows_loading() {
    let app = TestApp::new(ValidationMode::Strict, Some("admin"), false).await;
    let (status, location, body) = app.get("/admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("Loading..."));

    let (_, _, body) = app.get("/login").await;
    assert!(body.contains("Loading..."));
}

#[tokio::test]
async fn test_login_submit_while_pending_waits_for_startup_check() {
    let app = TestApp::new(ValidationMode::Legacy, None, false).await;
    let (status, location, body) = app.post_form("/login", "token=field-team").await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("Loading..."));
    assert!(app.state.gate.state().await.loading);

    app.state.gate.initialize().await.unwrap();
    let (status, location, _) = app.post_form("/login", "token=field-team").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin"));
}

#[tokio::test]
async fn test_login_submit_when_authenticated_redirects() {
    let app = TestApp::logged_in().await;
    let (status, location, _) = app.post_form("/login", "token=wrong").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin"));
    assert!(app.state.gate.state().await.is_logged_in);
}

#[tokio::test]
async fn test_guarded_route_redirects_to_login() {
    let app = TestApp::logged_out().await;
    for uri in ["/admin", "/admin/field-creation"] {
        let (status, location, _) = app.get(uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location.as_deref(), Some("/login"));
    }
}

#[tokio::test]
async fn test_login_page_redirects_when_authenticated() {
    let app = TestApp::logged_in().await;
    let (status, location, _) = app.get("/login").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin"));
}

#[tokio::test]
async fn test_login_with_secret_then_admin() {
    let app = TestApp::logged_out().await;
    let (status, location, _) = app.post_form("/login", "token=admin").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin"));

    let (status, _, body) = app.get("/admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/admin/field-creation"));

    let (_, _, body) = app.get("/api/session").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["is_logged_in"], true);
    assert_eq!(json["loading"], false);
}

#[tokio::test]
async fn test_strict_login_rejects_wrong_token() {
    let app = TestApp::logged_out().await;
    let (status, _, body) = app.post_form("/login", "token=wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid token."));

    let (status, location, _) = app.get("/admin").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_legacy_login_accepts_any_token() {
    let app = TestApp::new(ValidationMode::Legacy, None, true).await;
    let (status, location, _) = app.post_form("/login", "token=wrong").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin"));
}

#[tokio::test]
async fn test_empty_token_is_ignored() {
    let app = TestApp::logged_out().await;
    let (status, _, body) = app.post_form("/login", "token=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"name="token""#));
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::logged_in().await;
    let (status, location, _) = app.post_form("/logout", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));

    let (_, location, _) = app.get("/admin").await;
    assert_eq!(location.as_deref(), Some("/login"));
}

// ============================================================================
// Field creation form
// ============================================================================

#[tokio::test]
async fn test_field_creation_success_flow() {
    let app = TestApp::logged_in().await;
    let (status, _, body) = app
        .post_multipart("/admin/field-creation", &valid_parts())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(FORM_SUCCESS_MESSAGE));
    assert!(body.contains(r#"content="2;url=/admin""#));

    let fields = app.state.catalog.query_all().await.unwrap();
    assert_eq!(fields.len(), 1);
    let id = fields[0].id;

    let (_, _, body) = app.get("/").await;
    assert!(body.contains("Rice Paddy"));

    let (status, _, body) = app.get(&format!("/?field={}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"class="layout view-map""#));
    assert!(body.contains("<th>A</th><th>B</th>"));
    assert!(body.contains("<td>1</td><td>2</td>"));

    let (_, _, body) = app.get(&format!("/api/fields/{}/map", id)).await;
    let command: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(command["overlay"].as_array().unwrap().len(), 2);
    assert_eq!(command["viewport"]["bounds"]["south_west"]["lat"], 14.7);

    let (_, _, body) = app
        .get(&format!("/api/fields/{}/rows?scroll_top=0&viewport_height=350", id))
        .await;
    let window: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(window["start"], 0);
    assert_eq!(window["end"], 2);
    assert_eq!(window["rows"][1]["cells"], serde_json::json!(["3", "4"]));
}

#[tokio::test]
async fn test_field_creation_failure_shows_generic_message() {
    let app = TestApp::logged_in().await;
    let parts = vec![
        Part::Text("title", "Broken"),
        Part::File("shapeFile", "plots.rar", rar_bytes()),
        Part::File("tableFile", "yield.xlsx", ab_spreadsheet()),
    ];
    let (status, _, body) = app.post_multipart("/admin/field-creation", &parts).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains(FORM_ERROR_MESSAGE));
    assert!(app.state.catalog.query_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_field_creation_requires_session() {
    let app = TestApp::logged_out().await;
    let (status, location, _) = app
        .post_multipart("/admin/field-creation", &valid_parts())
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));
    assert!(app.state.catalog.query_all().await.unwrap().is_empty());
}

// ============================================================================
// JSON API
// ============================================================================

#[tokio::test]
async fn test_api_create_requires_session() {
    let app = TestApp::logged_out().await;
    let (status, _, body) = app.post_multipart("/api/fields", &valid_parts()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_api_create_and_fetch() {
    let app = TestApp::logged_in().await;
    let (status, _, body) = app.post_multipart("/api/fields", &valid_parts()).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(created["feature_count"], 2);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, _, body) = app.get("/api/fields").await;
    let list: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(list[0]["title"], "Rice Paddy");

    let (status, _, body) = app.get(&format!("/api/fields/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    let field: Value = serde_json::from_str(&body).unwrap();
    let table: Value = serde_json::from_str(field["table"].as_str().unwrap()).unwrap();
    assert_eq!(table, test_utils::ab_records());
}

#[tokio::test]
async fn test_api_reports_classified_ingestion_error() {
    let app = TestApp::logged_in().await;
    let parts = vec![
        Part::Text("title", "Empty"),
        Part::File("shapeFile", "empty.zip", empty_field_archive()),
        Part::File("tableFile", "yield.xlsx", ab_spreadsheet()),
    ];
    let (status, _, body) = app.post_multipart("/api/fields", &parts).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "EXTRACT_FILE_EMPTY");
}

#[tokio::test]
async fn test_api_field_lookup_errors() {
    let app = TestApp::logged_out().await;
    let (status, _, _) = app.get("/api/fields/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = app
        .get("/api/fields/00000000-0000-4000-8000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "FIELD_NOT_FOUND");
}
