//! HTTP server setup and the request pipeline.
//!
//! # Responsibilities
//! - Create the Axum router with the pipeline handler
//! - Wire up middleware (CORS, tracing, timeout, request ID, gates)
//! - Bind server to listener, serve until shutdown
//! - Drive the per-request gate sequence: secret → rate limit →
//!   cache → method → route → upstream fetch
//! - Write successful responses through to the cache off the response
//!   path
//!
//! # Gate ordering
//! The secret and rate-limit gates are middleware layers and run
//! before the handler; the cache lookup lives in the handler. A cached
//! response is therefore never served to a caller that fails either
//! gate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::{CachedEntry, ResponseCache};
use crate::config::ProxyConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{match_path, Route};
use crate::security::auth::{auth_middleware, AuthState};
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::upstream::UpstreamClient;

/// Application state injected into the pipeline handler.
#[derive(Clone)]
pub struct AppState {
    /// Upstream client; absent when no bearer token is configured.
    pub upstream: Option<UpstreamClient>,
    /// Response cache; absent when disabled in config.
    pub cache: Option<ResponseCache>,
    /// Cache-Control directive attached to successful fetches.
    pub cache_control: String,
}

impl AppState {
    fn upstream_client(&self) -> ProxyResult<&UpstreamClient> {
        self.upstream
            .as_ref()
            .ok_or_else(|| ProxyError::Config("upstream bearer token not configured".to_string()))
    }
}

/// HTTP server for the lyrics proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let upstream = match config.upstream.bearer_token.clone() {
            Some(token) => match UpstreamClient::new(
                &config.upstream.base_url,
                token,
                Duration::from_secs(config.timeouts.upstream_secs),
            ) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build upstream client");
                    None
                }
            },
            None => {
                tracing::warn!("No upstream bearer token configured; fetches will fail");
                None
            }
        };

        let cache = config.cache.enabled.then(|| {
            ResponseCache::new(
                Duration::from_secs(config.cache.edge_ttl_secs),
                config.cache.max_entries,
            )
        });

        let state = AppState {
            upstream,
            cache,
            cache_control: response::cache_control(
                config.cache.edge_ttl_secs,
                config.cache.browser_ttl_secs,
            ),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added later wrap the earlier ones, so the request passes
    /// through the bottom of this chain first: request ID → trace →
    /// timeout → secret gate → rate-limit gate → handler.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(pipeline_handler))
            .route("/", any(pipeline_handler))
            .with_state(state);

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        let auth = AuthState {
            shared_secret: config.auth.shared_secret.clone(),
        };
        router = router.layer(middleware::from_fn_with_state(auth, auth_middleware));

        router.layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Pipeline handler: cache gate, method gate, routing, execution.
async fn pipeline_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let cache_key = ResponseCache::key(
        method.as_str(),
        request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or(&path),
    );

    // Cache gate: a hit bypasses everything below.
    if let Some(cache) = &state.cache {
        if let Some(entry) = cache.lookup(&cache_key) {
            metrics::record_cache_hit();
            let response = response::replay_cached(&entry);
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                route_label(&path),
                start_time,
            );
            tracing::debug!(request_id = %request_id, path = %path, "Served from cache");
            return response;
        }
    }

    let response = match dispatch(&state, &method, &path, &cache_key).await {
        Ok(response) => response,
        Err(err) => {
            if let ProxyError::Upstream { status, .. } = &err {
                metrics::record_upstream_error(*status);
            }
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %err,
                "Request failed"
            );
            err.into_response()
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        route_label(&path),
        start_time,
    );
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "Request completed"
    );
    response
}

/// Method gate, routing gate and execution.
async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    cache_key: &str,
) -> ProxyResult<Response> {
    if *method == Method::OPTIONS {
        return Ok(response::preflight());
    }
    if *method != Method::GET {
        return Err(ProxyError::MethodNotAllowed);
    }

    let route = match_path(path).ok_or(ProxyError::NotFound)?;

    let body = match route {
        Route::Root => return Ok(response::json(&response::info_payload())),
        Route::Song(id) => serde_json::to_vec(&state.upstream_client()?.fetch_song(&id).await?)?,
        Route::Artist(id) => serde_json::to_vec(&state.upstream_client()?.fetch_artist(&id).await?)?,
    };

    metrics::record_cache_miss();
    let response = response::cacheable_json(body.clone(), &state.cache_control);

    // Write-through is detached from the response path: the client
    // never waits on it, and a dropped write only costs a future miss.
    if let Some(cache) = state.cache.clone() {
        let key = cache_key.to_string();
        let entry = CachedEntry::new(200, response::replayable_headers(&state.cache_control), body);
        tokio::spawn(async move {
            cache.store(key, entry);
        });
    }

    Ok(response)
}

/// Route label for metrics; avoids unbounded id cardinality.
fn route_label(path: &str) -> &'static str {
    match match_path(path) {
        Some(Route::Root) => "root",
        Some(Route::Song(_)) => "song",
        Some(Route::Artist(_)) => "artist",
        None => "none",
    }
}
