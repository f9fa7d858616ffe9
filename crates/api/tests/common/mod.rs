#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use preferences_api::config::ServerConfig;
use preferences_api::middleware::auth::API_TOKEN_HEADER;
use preferences_api::router::build_app_router;
use preferences_api::state::AppState;

/// API key accepted by the test app.
pub const TEST_TOKEN: &str = "test-api-token";

/// Identity the test key resolves to.
pub const TEST_USER: &str = "appuser";

/// Build a test `ServerConfig` with safe defaults.
///
/// The database URL is never used: tests hand the router a pool directly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5000")],
        request_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 5,
        run_migrations: false,
        table_schema: None,
        api_token: TEST_TOKEN.to_string(),
        api_user: TEST_USER.to_string(),
    }
}

/// Build the full application router, with the same middleware stack
/// production uses, over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Like [`build_test_app`], with a caller-supplied configuration.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config).unwrap();
    build_app_router(state)
}

/// Send a request through the app and return the response.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// GET without credentials.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET with the `api_token` header set to `token`.
pub async fn get_with_token(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(API_TOKEN_HEADER, token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET authenticated with [`TEST_TOKEN`].
pub async fn get_auth(app: Router, uri: &str) -> Response<Body> {
    get_with_token(app, uri, TEST_TOKEN).await
}

/// POST a raw body with an optional token.
pub async fn post_raw(app: Router, uri: &str, body: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(API_TOKEN_HEADER, token);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// POST JSON authenticated with [`TEST_TOKEN`].
pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, &body.to_string(), Some(TEST_TOKEN)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Insert a row directly, bypassing the API.
pub async fn insert_preference(pool: &PgPool, title: &str, link: &str, category: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO preferences (title, link, category) VALUES ($1, $2, $3) RETURNING id")
        .bind(title)
        .bind(link)
        .bind(category)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Number of rows in the preferences table.
pub async fn row_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM preferences")
        .fetch_one(pool)
        .await
        .unwrap()
}
