//! # Conduct API
//!
//! HTTP surface of the school behavior monitor: students, detention slots,
//! infractions, attendance, staff administration, the parent portal and
//! analytics.
//!
//! ## Architecture
//!
//! - **Routes**: URL structure, one module per resource
//! - **Handlers**: Request extraction and response shaping; the rules live in
//!   [`conduct_core::Workflow`]
//! - **Middleware**: Identity extraction and error mapping
//! - **Config**: Environment configuration
//!
//! The crate is storage agnostic. The binary hands it a workflow built over
//! PostgreSQL; tests use the in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Authentication extractors and error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use conduct_core::Workflow;
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub workflow: Workflow,
}

/// Builds the router with every resource mounted. No transport layers are
/// applied, which keeps it usable from tests.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::students::routes())
        .merge(routes::slots::routes())
        .merge(routes::violations::routes())
        .merge(routes::attendance::routes())
        .merge(routes::teachers::routes())
        .merge(routes::portal::routes())
        .merge(routes::analytics::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(middleware::auth::USER_ID_HEADER),
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server. Logging must already be initialised by the caller.
///
/// # Example
///
/// ```no_run
/// # async fn run(workflow: conduct_core::Workflow) -> eyre::Result<()> {
/// let config = conduct_api::config::ApiConfig::from_env()?;
/// conduct_api::start_server(config, workflow).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, workflow: Workflow) -> Result<()> {
    let state = Arc::new(ApiState { workflow });

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
