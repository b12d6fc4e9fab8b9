//! Local edge emulator.
//!
//! # Responsibilities
//! - Create Axum Router answering every path with the engine's redirect
//! - Wire up middleware (request ID, tracing, timeout)
//! - Swap in a new engine when a validated config arrives
//! - Map unknown or missing hosts to 503, as the platform does for a failed function

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, RedirectConfig};
use crate::engine::{QueryString, RedirectEngine};
use crate::error::RedirectError;
use crate::http::request::{request_host, request_id, MakeRequestUuidV4};
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ArcSwap<RedirectEngine>>,
}

/// HTTP server running the redirect engine on every request.
pub struct HttpServer {
    router: Router,
    engine: Arc<ArcSwap<RedirectEngine>>,
    config: RedirectConfig,
}

impl HttpServer {
    /// Create a new server; fails if `config` does not validate.
    pub fn new(config: RedirectConfig) -> Result<Self, ConfigError> {
        let engine = Arc::new(ArcSwap::from_pointee(RedirectEngine::from_config(&config)?));

        let state = AppState {
            engine: engine.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            engine,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(redirect_handler))
            .route("/", any(redirect_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Handle to the live engine, shared with the reload task.
    pub fn engine(&self) -> Arc<ArcSwap<RedirectEngine>> {
        self.engine.clone()
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    ///
    /// Configs received on `config_updates` replace the engine atomically;
    /// requests already holding the old engine finish with it.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RedirectConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.engine.load().table().len(),
            "Edge emulator starting"
        );

        let engine = self.engine.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_config(&engine, &new_config);
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => {},
                    _ = shutdown_signal() => {},
                }
            })
            .await?;

        tracing::info!("Edge emulator stopped");
        Ok(())
    }
}

/// Compile `config` and swap it in, keeping the current engine on failure.
pub fn apply_config(engine: &ArcSwap<RedirectEngine>, config: &RedirectConfig) -> bool {
    match RedirectEngine::from_config(config) {
        Ok(new_engine) => {
            let rules = new_engine.table().len();
            engine.store(Arc::new(new_engine));
            metrics::record_config_reload(true);
            tracing::info!(rules, "Redirect rules reloaded");
            true
        }
        Err(e) => {
            metrics::record_config_reload(false);
            tracing::error!(error = %e, "Rejected config update, keeping current rules");
            false
        }
    }
}

/// Answers every request with the engine's redirect.
async fn redirect_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request).to_string();
    let path = request.uri().path();

    let Some(host) = request_host(&request) else {
        tracing::warn!(request_id = %request_id, path = %path, "Request without host");
        return function_failed(&RedirectError::MissingHost);
    };

    let engine = state.engine.load();
    let query = request
        .uri()
        .query()
        .map(|raw| QueryString::parse_for(raw, engine.encoding()))
        .unwrap_or_default();

    match engine.decide(host, path, &query) {
        Ok(redirect) => {
            metrics::record_redirect(host, redirect.status_code(), start);
            let status = StatusCode::from_u16(redirect.status_code())
                .unwrap_or(StatusCode::MOVED_PERMANENTLY);
            match HeaderValue::from_str(&redirect.location) {
                Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
                Err(e) => {
                    tracing::error!(
                        request_id = %request_id,
                        location = %redirect.location,
                        error = %e,
                        "Location is not a valid header value"
                    );
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        Err(e) => {
            metrics::record_unknown_host();
            tracing::warn!(
                request_id = %request_id,
                host = %host,
                path = %path,
                "No redirect rule for host"
            );
            function_failed(&e)
        }
    }
}

fn function_failed(error: &RedirectError) -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, error.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::QueryEncoding;
    use tower::ServiceExt;

    fn router() -> Router {
        HttpServer::new(RedirectConfig::canonical("example.com"))
            .unwrap()
            .router
    }

    #[tokio::test]
    async fn test_router_redirects() {
        let res = router()
            .oneshot(
                Request::builder()
                    .uri("/a-nested-path?x=1")
                    .header("Host", "play.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "https://www.example.com/play/a-nested-path?x=1"
        );
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_router_without_host_is_service_unavailable() {
        let res = router()
            .oneshot(Request::builder().uri("/x").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_router_does_not_reencode_component_queries() {
        let mut config = RedirectConfig::canonical("example.com");
        config.query.encoding = QueryEncoding::Component;
        let router = HttpServer::new(config).unwrap().router;

        let res = router
            .oneshot(
                Request::builder()
                    .uri("/s?q=a%20b&tag=x%26y")
                    .header("Host", "docs.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "https://www.example.com/docs/s?q=a%20b&tag=x%26y"
        );
    }

    #[test]
    fn test_apply_config_keeps_engine_on_invalid_update() {
        let engine = ArcSwap::from_pointee(RedirectEngine::canonical("example.com"));

        let mut invalid = RedirectConfig::canonical("example.org");
        invalid.rules.clear();
        assert!(!apply_config(&engine, &invalid));
        assert!(engine.load().table().lookup("docs.example.com").is_ok());

        assert!(apply_config(&engine, &RedirectConfig::canonical("example.org")));
        assert!(engine.load().table().lookup("docs.example.com").is_err());
        assert!(engine.load().table().lookup("docs.example.org").is_ok());
    }
}
