use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use vitrine_api::config::{ServerConfig, StorageConfig};
use vitrine_api::routes;
use vitrine_api::state::AppState;
use vitrine_db::DbPool;
use vitrine_pipeline::{CarouselOrchestrator, PostPublisher};
use vitrine_render::SlideRenderer;
use vitrine_social::{SocialClient, SocialGateway};
use vitrine_storage::{MemoryStorage, ObjectStorage};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// in-memory object storage, no snapshot render tier, and a social API URL
/// pointing at a closed local port so nothing ever leaves the process.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        render_api_url: None,
        render_timeout_secs: 5,
        settle_ms: 0,
        storage: StorageConfig::Memory,
        social_api_url: "http://127.0.0.1:9".to_string(),
        social_api_token: None,
        contact_instagram: Some("@vitrine.estudio".to_string()),
        contact_facebook: None,
        contact_linkedin: None,
    }
}

/// A pool that connects to nothing.
///
/// `connect_lazy` defers the first connection attempt until a query runs,
/// and the short acquire timeout makes that attempt fail fast. Tests that
/// only exercise routing, middleware, validation, or storage never touch
/// the pool; tests that do reach the database see a deterministic error.
pub fn lazy_pool() -> DbPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy("postgres://127.0.0.1:1/unreachable")
        .unwrap()
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: DbPool) -> Router {
    let (app, _storage) = build_test_app_with_storage(pool);
    app
}

/// Like [`build_test_app`], but hands back the in-memory storage so tests
/// can assert on the objects that uploads actually wrote.
pub fn build_test_app_with_storage(pool: DbPool) -> (Router, Arc<MemoryStorage>) {
    let config = test_config();
    let event_bus = Arc::new(vitrine_events::EventBus::default());

    let storage = Arc::new(MemoryStorage::new());
    let storage_dyn: Arc<dyn ObjectStorage> = Arc::clone(&storage) as Arc<dyn ObjectStorage>;

    let renderer = Arc::new(SlideRenderer::default());
    let social: Arc<dyn SocialGateway> = Arc::new(SocialClient::new(
        config.social_api_url.clone(),
        config.social_api_token.clone(),
    ));
    let orchestrator =
        CarouselOrchestrator::new(Arc::clone(&renderer)).with_settle_delay(Duration::ZERO);
    let publisher = Arc::new(PostPublisher::new(
        pool.clone(),
        orchestrator,
        Arc::clone(&storage_dyn),
        social,
        Arc::clone(&event_bus),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        event_bus,
        storage: storage_dyn,
        publisher,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    (app, storage)
}

/// Send a GET request to the app and return the raw response.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a single-file `multipart/form-data` body.
///
/// Assembles the multipart payload by hand so tests control the exact
/// field name, filename, and bytes on the wire.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    field_name: &str,
    file_name: &str,
    bytes: &[u8],
) -> Response<Body> {
    const BOUNDARY: &str = "vitrine-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
