//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Construct the three handlers from their config sections
//! - Create the Axum Router and mount each handler on its route
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Serve on a listener until shutdown is signalled

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath, Request},
    http,
    middleware::{self, Next},
    response::Response,
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::echo::EchoHandler;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::wait_for;
use crate::observability::metrics;
use crate::poster::{FormPoster, NetworkError};
use crate::upload::UploadHandler;

/// Errors raised while building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("cannot set up form poster: {0}")]
    Poster(#[from] NetworkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upload: Arc<UploadHandler>,
    pub echo: Arc<EchoHandler>,
    pub poster: Arc<FormPoster>,
    pub poster_fields: Arc<BTreeMap<String, String>>,
    pub max_body_size: usize,
}

impl AppState {
    /// Build every handler from its configuration section.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServerError> {
        Ok(Self {
            upload: Arc::new(UploadHandler::new(config.upload.clone())),
            echo: Arc::new(EchoHandler::new(config.echo.clone())),
            poster: Arc::new(FormPoster::from_config(&config.poster)?),
            poster_fields: Arc::new(config.poster.fields.clone()),
            max_body_size: config.security.max_body_size,
        })
    }
}

/// HTTP server hosting the upload, echo and poster routes.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let echo_base = config.echo.route.trim_end_matches('/');
        let echo_slash = format!("{}/", echo_base);
        let echo_below = format!("{}/{{*path_info}}", echo_base);

        let mut router = Router::new()
            .route(&config.upload.route, any(handlers::upload_page))
            .route(&config.echo.route, any(handlers::echo_page))
            .route(&echo_below, any(handlers::echo_page_with_path))
            .route(&config.poster.route, any(handlers::post_direct));
        if echo_slash != config.echo.route {
            router = router.route(&echo_slash, any(handlers::echo_page_with_path));
        }

        router
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &http::Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// A handle to the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upload_route = %self.config.upload.route,
            echo_route = %self.config.echo.route,
            poster_route = %self.config.poster.route,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Count and time every routed request.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;
    metrics::record_request(&route, &method, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    fn server(root: &std::path::Path) -> HttpServer {
        let mut config = AppConfig::default();
        config.upload.directory = root.join("uploads");
        config.upload.temp_dir = Some(root.to_path_buf());
        HttpServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_routes_are_mounted() {
        let root = tempfile::tempdir().unwrap();
        let router = server(root.path()).router();

        for path in ["/post_file", "/submit", "/submit/", "/submit/a/b", "/submit/%FF"] {
            let response = router
                .clone()
                .oneshot(http::Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {}", path);
            assert!(response
                .headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html"));
        }

        let response = router
            .oneshot(http::Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let root = tempfile::tempdir().unwrap();
        let router = server(root.path()).router();

        let response = router
            .clone()
            .oneshot(http::Request::get("/submit").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let generated = response.headers().request_id().to_string();
        assert_ne!(generated, "unknown");

        let response = router
            .oneshot(
                http::Request::get("/submit")
                    .header("x-request-id", "given-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers().request_id(), "given-id");
    }

    #[tokio::test]
    async fn test_invalid_poster_endpoint_fails_construction() {
        let mut config = AppConfig::default();
        config.poster.endpoint = "::not a url::".into();
        assert!(matches!(
            HttpServer::new(config),
            Err(ServerError::Poster(NetworkError::InvalidEndpoint { .. }))
        ));
    }
}
