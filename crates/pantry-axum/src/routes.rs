//! Route definitions and router construction.
//!
//! Callable operations are POST endpoints under `/api`, named exactly like
//! the operations the app invokes.

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use subtle::ConstantTimeEq;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::bootstrap::{AxumContext, CorsConfig, ServerConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Callable routes without the `/api` prefix (for nesting under `/api`).
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/fetchAllUsers",
            post(handlers::directory::fetch_all_users),
        )
        .route(
            "/sendNotificationTo",
            post(handlers::notifications::send_notification_to),
        )
        .route(
            "/analyzeImageContents",
            post(handlers::analysis::analyze_image_contents),
        )
}

/// Create the main Axum router.
///
/// `/health` is always open. When `config.api_token` is set, every `/api/*`
/// route requires `Authorization: Bearer <token>`.
pub fn create_router(ctx: AxumContext, config: &ServerConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(&config.cors);

    let mut api = api_routes();
    if let Some(token) = &config.api_token {
        // Store the full header value once so the check is a plain comparison.
        let expected: Arc<str> = Arc::from(format!("Bearer {token}"));
        api = api.route_layer(middleware::from_fn(move |req: Request, next: Next| {
            let expected = Arc::clone(&expected);
            async move { validate_bearer(expected, req, next).await }
        }));
    }

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api.with_state(state).layer(cors))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
                request_id = %Uuid::new_v4(),
            )
        }))
}

/// Auth middleware: validate the service bearer token.
///
/// Returns 401 Unauthorized with `WWW-Authenticate: Bearer` on failure.
async fn validate_bearer(
    expected: Arc<str>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth = req.headers().get(header::AUTHORIZATION).map(HeaderValue::as_bytes);

    match auth {
        Some(h) if token_matches(h, expected.as_bytes()) => Ok(next.run(req).await),
        _ => {
            tracing::warn!(
                path = %req.uri().path(),
                "Unauthorized API request - missing or invalid token"
            );
            let mut res = Response::new(axum::body::Body::empty());
            *res.status_mut() = StatusCode::UNAUTHORIZED;
            res.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
            Ok(res)
        }
    }
}

/// Compare header bytes without short-circuiting on the first mismatch.
fn token_matches(presented: &[u8], expected: &[u8]) -> bool {
    bool::from(presented.ct_eq(expected))
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
