use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use metalca_common::{Config, MetaLcaError};
use openlca_client::LcaEngine;

pub mod catalog;
pub mod envelope;
pub mod pages;
pub mod resolver;
pub mod rest;
pub mod session;
pub mod uploads;

use resolver::DatasetResolver;
use session::SessionStore;
use uploads::UploadStore;

pub struct AppState {
    pub config: Config,
    pub engine: Arc<dyn LcaEngine>,
    pub resolver: DatasetResolver,
    pub uploads: UploadStore,
    pub sessions: SessionStore,
}

impl AppState {
    /// Wire up shared state. Creates the upload directory if needed.
    pub async fn new(config: Config, engine: Arc<dyn LcaEngine>) -> Result<Self, MetaLcaError> {
        let uploads = UploadStore::init(&config.upload_dir).await?;
        Ok(Self {
            resolver: DatasetResolver::new(engine.clone()),
            engine,
            uploads,
            sessions: SessionStore::new(),
            config,
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.upload_max_bytes);

    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Pages
        .route("/dataset", get(pages::dataset_page))
        .route("/login", post(pages::login))
        // REST API
        .route("/api/check-openlca", get(rest::api_check_openlca))
        .route("/api/datasets", get(rest::api_datasets))
        .route(
            "/api/upload-dataset",
            post(rest::upload::api_upload_dataset).layer(upload_limit),
        )
        .route("/api/uploaded-datasets", get(rest::upload::api_uploaded_datasets))
        .route("/api/openlca/databases", get(rest::api_openlca_databases))
        .route("/api/openlca/processes/{database}", get(rest::api_openlca_processes))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
