//! HTTP API for the order-management service.
//!
//! Exposes login/logout and the order endpoints under `/api/v1`, guarded by
//! bearer tokens, plus unauthenticated `/health` and `/metrics`. Requests
//! are traced with `tower-http` and counted through the `metrics` facade.

pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;

use auth::AuthGate;
use axum::Router;
use axum::routing::{get, post};
use domain::OrderService;
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Everything a request handler needs, built once at startup.
pub struct AppState<R: OrderRepository> {
    pub orders: OrderService<R>,
    pub auth: AuthGate,
}

impl<R: OrderRepository> AppState<R> {
    pub fn new(orders: OrderService<R>, auth: AuthGate) -> Self {
        Self { orders, auth }
    }

    /// Wires the default order policies and the configured auth gate around
    /// `repository`.
    pub fn from_config(config: &Config, repository: R) -> Self {
        let auth = AuthGate::new(&config.jwt.secret, config.credentials.clone(), config.jwt.ttl);
        Self::new(OrderService::new(repository), auth)
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: OrderRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let protected = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/orders", post(routes::orders::create::<R>))
        .route("/orders/all", get(routes::orders::list::<R>))
        .route(
            "/orders/{consignment_id}/cancel",
            post(routes::orders::cancel::<R>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth::<R>,
        ));

    let api = Router::new()
        .route("/login", post(routes::auth::login::<R>))
        .merge(protected)
        .with_state(state);

    let metrics_router = Router::new()
        .route("/metrics", get(routes::ops::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::ops::health))
        .nest("/api/v1", api)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
