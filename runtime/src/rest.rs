// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for Vitrine.
//!
//! Thin handlers over the ingestion pipeline, the catalog editing
//! operations and the feed writer. Errors come back as `{ "error": "..." }`
//! with a status code matching the failure.

use crate::config::Settings;
use crate::feed::render_feed;
use crate::ingest::{links_from_csv, IngestError, Ingestor, ManualForm, ManualUpload, SubmitOutcome};
use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use vitrine_catalog::{
    remove_item, set_published, update_item, CatalogError, CatalogItem, CatalogStore,
    CategoryBook, ItemPatch, JsonFileStore,
};

/// Largest accepted request body (image and CSV uploads).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Everything the handlers share.
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<dyn CatalogStore>,
    pub categories: CategoryBook,
    pub ingestor: Ingestor,
}

impl AppState {
    pub fn new(
        settings: Settings,
        store: Arc<dyn CatalogStore>,
        categories: CategoryBook,
        ingestor: Ingestor,
    ) -> Self {
        Self {
            settings,
            store,
            categories,
            ingestor,
        }
    }

    /// File-backed state under the configured data directory.
    pub fn open(settings: Settings) -> anyhow::Result<Self> {
        std::fs::create_dir_all(settings.uploads_dir()).with_context(|| {
            format!("cannot create {}", settings.uploads_dir().display())
        })?;
        let store = JsonFileStore::open(settings.db_path()).context("cannot open catalog")?;
        let categories =
            CategoryBook::open(settings.categories_path()).context("cannot open categories")?;
        let ingestor = Ingestor::from_settings(&settings);
        Ok(Self::new(settings, Arc::new(store), categories, ingestor))
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let uploads = ServeDir::new(state.settings.uploads_dir());

    Router::new()
        .route("/health", get(health))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/manual", post(create_manual_item))
        .route("/api/items/:id", put(edit_item).delete(delete_item))
        .route("/api/items/:id/toggle-xml", patch(toggle_xml))
        .route("/api/upload-csv", post(upload_csv))
        .route("/api/categories", get(list_categories).post(add_category))
        .route("/api/categories/:name", delete(remove_category))
        .route("/api/feed.xml", get(feed))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Serve the REST API on `addr` until the process stops.
pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    tracing::info!("REST API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("received shutdown signal");
    }
}

// ── Errors ──────────────────────────────────────────────────────

/// A failed request, rendered as JSON.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Unprocessable(m) => m,
            ApiError::Internal(m) => {
                tracing::error!("request failed: {m}");
                m
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::ItemNotFound(id) => ApiError::NotFound(format!("item not found: {id}")),
            CatalogError::InvalidInput(m) => ApiError::BadRequest(m),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::MalformedInput(m) => ApiError::BadRequest(m),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_items(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<CatalogItem>>> {
    Ok(Json(state.store.list_all()?))
}

#[derive(Debug, Deserialize)]
struct CreateItemRequest {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateItemRequest>,
) -> ApiResult<Json<CatalogItem>> {
    let link = body.url.unwrap_or_default();
    let outcome = state
        .ingestor
        .submit(state.store.as_ref(), &link, body.category.as_deref())
        .await?;

    match outcome {
        SubmitOutcome::Created(item) => Ok(Json(item)),
        SubmitOutcome::DuplicateRejected(link) => {
            Err(ApiError::Conflict(format!("duplicate link: {link}")))
        }
        SubmitOutcome::UnresolvableRejected(link) => {
            Err(ApiError::Unprocessable(format!("no image found for {link}")))
        }
    }
}

async fn create_manual_item(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<CatalogItem>> {
    let mut upload = ManualUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            upload.original_name = field.file_name().map(str::to_string);
            upload.bytes = field.bytes().await?.to_vec();
            continue;
        }
        let value = Some(field.text().await?);
        let form: &mut ManualForm = &mut upload.form;
        match name.as_str() {
            "title" => form.title = value,
            "category" => form.category = value,
            "price" => form.price = value,
            "moldPrice" => form.mold_price = value,
            "width" => form.width = value,
            "height" => form.height = value,
            "quantity" => form.quantity = value,
            "description" => form.description = value,
            _ => {}
        }
    }

    let item = state
        .ingestor
        .submit_manual(state.store.as_ref(), upload)
        .await?;
    Ok(Json(item))
}

async fn upload_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut file = None;
    let mut category = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => file = Some(field.bytes().await?),
            "category" => category = Some(field.text().await?),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::BadRequest("no file uploaded".to_string()))?;
    let links = links_from_csv(file.as_ref())
        .map_err(|e| ApiError::BadRequest(format!("unreadable CSV: {e}")))?;

    let report = state
        .ingestor
        .import_batch(state.store.as_ref(), &links, category.as_deref())
        .await?;

    Ok(Json(json!({
        "message": format!("Processed {}", report.accepted_count),
        "acceptedCount": report.accepted_count,
        "newItems": report.accepted_items,
    })))
}

async fn edit_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(changes): Json<ItemPatch>,
) -> ApiResult<Json<CatalogItem>> {
    Ok(Json(update_item(state.store.as_ref(), &id, &changes)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    in_xml: bool,
}

async fn toggle_xml(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ToggleRequest>,
) -> ApiResult<Json<CatalogItem>> {
    Ok(Json(set_published(state.store.as_ref(), &id, body.in_xml)?))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let item = remove_item(state.store.as_ref(), &id)?;
    state.ingestor.materializer().reclaim(&item).await;
    Ok(Json(json!({ "success": true })))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.categories.list()?))
}

#[derive(Debug, Deserialize)]
struct CategoryRequest {
    name: String,
}

async fn add_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategoryRequest>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.categories.add(&body.name)?))
}

async fn remove_category(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.categories.remove(&name)?))
}

async fn feed(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResult<Response> {
    let items = state.store.list_all()?;
    let xml = render_feed(&items, &request_base_url(&headers))
        .map_err(|e| ApiError::Internal(format!("{e:#}")))?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

/// `<proto>://<host>` as seen by the client, honouring `X-Forwarded-Proto`.
pub fn request_base_url(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{proto}://{host}")
}
