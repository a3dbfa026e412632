//! REST API integration tests, driven through the router with `oneshot`.

use assert_json_diff::assert_json_include;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use vitrine_catalog::{CategoryBook, JsonFileStore};
use vitrine_runtime::config::Settings;
use vitrine_runtime::ingest::Ingestor;
use vitrine_runtime::rest::{router, AppState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";
const BOUNDARY: &str = "vitrine-test-boundary";

struct TestApp {
    app: Router,
    settings: Settings,
    _dir: TempDir,
}

fn test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::with_data_dir(dir.path());
    settings.http.timeout_ms = 5_000;

    let store = JsonFileStore::open(settings.db_path()).unwrap();
    let categories = CategoryBook::open(settings.categories_path()).unwrap();
    let ingestor = Ingestor::from_settings(&settings);
    let state = AppState::new(settings.clone(), Arc::new(store), categories, ingestor);

    TestApp {
        app: router(Arc::new(state)),
        settings,
        _dir: dir,
    }
}

async fn image_host() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .mount(&server)
        .await;
    server
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let (status, bytes) = send(app, builder.body(body).unwrap()).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Multipart body from `(field, file name, bytes)` parts.
fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn with_uri(mut req: Request<Body>, uri: &str) -> Request<Body> {
    *req.uri_mut() = uri.parse().unwrap();
    req
}

// ── Tests ──

#[tokio::test]
async fn test_health() {
    let t = test_app();
    let (status, body) = send_json(&t.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_json_include!(actual: body, expected: json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_create_item_outcomes() {
    let host = image_host().await;
    let t = test_app();
    let link = format!("{}/owl.png", host.uri());

    let (status, item) = send_json(
        &t.app,
        "POST",
        "/api/items",
        Some(json!({ "url": link, "category": "Toys" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: item.clone(),
        expected: json!({
            "originalUrl": link,
            "category": "Toys",
            "title": "Image Product",
            "inXml": true,
            "details": { "quantity": 1, "price": "", "moldPrice": "" }
        })
    );
    assert!(item["imageUrl"].as_str().unwrap().starts_with("/uploads/"));
    assert!(item["stockCode"].as_str().unwrap().starts_with("STK-"));

    let (status, _) = send_json(&t.app, "POST", "/api/items", Some(json!({ "url": link }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(&t.app, "POST", "/api/items", Some(json!({ "url": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send_json(
        &t.app,
        "POST",
        "/api/items",
        Some(json!({ "url": "not a link" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, items) = send_json(&t.app, "GET", "/api/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_toggle_and_feed() {
    let host = image_host().await;
    let t = test_app();
    let (_, item) = send_json(
        &t.app,
        "POST",
        "/api/items",
        Some(json!({ "url": format!("{}/fox.jpg", host.uri()) })),
    )
    .await;
    let id = item["id"].as_str().unwrap().to_string();
    let stock = item["stockCode"].as_str().unwrap().to_string();

    // Incomplete items stay out of the feed.
    let feed_req = || {
        Request::builder()
            .uri("/api/feed.xml")
            .header(header::HOST, "shop.example")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap()
    };
    let (_, xml) = send(&t.app, feed_req()).await;
    assert!(!String::from_utf8(xml).unwrap().contains("<product>"));

    let (status, edited) = send_json(
        &t.app,
        "PUT",
        &format!("/api/items/{id}"),
        Some(json!({ "title": "Fox", "details": { "price": 120, "moldPrice": "300" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: edited,
        expected: json!({
            "title": "Fox",
            "category": "General",
            "details": { "price": "120", "moldPrice": "300", "quantity": 1 }
        })
    );

    let resp = t.app.clone().oneshot(feed_req()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );
    let xml = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let xml = String::from_utf8(xml.to_vec()).unwrap();
    assert!(xml.contains(&format!("<stock_code>{stock}</stock_code>")));
    assert!(xml.contains("<name_mold>Silicone Mold Fox</name_mold>"));
    assert!(xml.contains("<image>https://shop.example/uploads/"));

    let (status, toggled) = send_json(
        &t.app,
        "PATCH",
        &format!("/api/items/{id}/toggle-xml"),
        Some(json!({ "inXml": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["inXml"], json!(false));

    let (_, xml) = send(&t.app, feed_req()).await;
    assert!(!String::from_utf8(xml).unwrap().contains("<product>"));
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let t = test_app();
    let (status, _) = send_json(
        &t.app,
        "PUT",
        "/api/items/missing",
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &t.app,
        "PATCH",
        "/api/items/missing/toggle-xml",
        Some(json!({ "inXml": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&t.app, "DELETE", "/api/items/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_reclaims_managed_image() {
    let host = image_host().await;
    let t = test_app();
    let (_, item) = send_json(
        &t.app,
        "POST",
        "/api/items",
        Some(json!({ "url": format!("{}/bee.webp", host.uri()) })),
    )
    .await;
    let id = item["id"].as_str().unwrap();
    let image_url = item["imageUrl"].as_str().unwrap();
    let file = t
        .settings
        .uploads_dir()
        .join(image_url.trim_start_matches("/uploads/"));
    assert!(file.exists());

    let served = Request::builder().uri(image_url).body(Body::empty()).unwrap();
    let (status, bytes) = send(&t.app, served).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, PNG_BYTES);

    let (status, body) = send_json(&t.app, "DELETE", &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    assert!(!file.exists());

    let (_, items) = send_json(&t.app, "GET", "/api/items", None).await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn test_manual_item() {
    let t = test_app();
    let req = with_uri(
        multipart(&[
            ("image", Some("mold.png"), PNG_BYTES),
            ("title", None, "Heart Mold".as_bytes()),
            ("price", None, "45".as_bytes()),
            ("moldPrice", None, "90".as_bytes()),
            ("quantity", None, "4".as_bytes()),
            ("category", None, "Love".as_bytes()),
        ]),
        "/api/items/manual",
    );
    let (status, bytes) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::OK);
    let item: Value = serde_json::from_slice(&bytes).unwrap();
    assert_json_include!(
        actual: item.clone(),
        expected: json!({
            "originalUrl": "manual_upload",
            "title": "Heart Mold",
            "category": "Love",
            "details": { "price": "45", "moldPrice": "90", "quantity": 4 }
        })
    );
    assert!(item["imageUrl"].as_str().unwrap().ends_with(".png"));

    let missing = with_uri(multipart(&[("title", None, "No image".as_bytes())]), "/api/items/manual");
    let (status, _) = send(&t.app, missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_csv() {
    let host = image_host().await;
    let t = test_app();
    let csv = format!(
        "url\n{0}/a.png\n{0}/a.png\n{0}/b.png\nnot a link\n",
        host.uri()
    );
    let req = with_uri(
        multipart(&[("file", Some("links.csv"), csv.as_bytes())]),
        "/api/upload-csv",
    );
    let (status, bytes) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_json_include!(
        actual: body.clone(),
        expected: json!({ "message": "Processed 2", "acceptedCount": 2 })
    );
    assert_eq!(body["newItems"].as_array().unwrap().len(), 2);

    let no_file = with_uri(multipart(&[("other", None, "x".as_bytes())]), "/api/upload-csv");
    let (status, _) = send(&t.app, no_file).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_categories() {
    let t = test_app();
    let (status, list) = send_json(&t.app, "GET", "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!(["General"]));

    let (_, list) = send_json(&t.app, "POST", "/api/categories", Some(json!({ "name": "Toys" }))).await;
    assert_eq!(list, json!(["General", "Toys"]));
    let (_, list) = send_json(&t.app, "POST", "/api/categories", Some(json!({ "name": "Toys" }))).await;
    assert_eq!(list, json!(["General", "Toys"]));

    let (status, _) = send_json(&t.app, "POST", "/api/categories", Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send_json(&t.app, "DELETE", "/api/categories/Toys", None).await;
    assert_eq!(list, json!(["General"]));
}
