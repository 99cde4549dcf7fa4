//! HTTP application wiring.
//!
//! Builds the shared [`AppState`] and the axum router with tracing applied.
//! CORS is configured separately so tests can drive the bare router.
use crate::auth::AccessControl;
use crate::config::{AppConfig, StorageBackend};
use crate::routes;
use crate::store::memory::InMemoryStore;
use crate::store::postgres::PostgresStore;
use crate::store::SurveyStore;
use anyhow::Context;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SurveyStore>,
    pub access: Arc<AccessControl>,
}

impl AppState {
    pub fn new(store: Arc<dyn SurveyStore>, access: AccessControl) -> Self {
        Self {
            store,
            access: Arc::new(access),
        }
    }
}

pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn SurveyStore> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            Arc::new(PostgresStore::connect(pg).await?)
        }
    };
    tracing::info!(backend = store.backend_name(), "survey store ready");

    let access = AccessControl::new(&config.tokens);
    if !access.has_admins() {
        tracing::warn!("no admin tokens configured; survey and option management is disabled");
    }
    Ok(AppState::new(store, access))
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
            )
        });

    routes::survey_routes().layer(trace_layer).with_state(state)
}

/// Allow the listed origins, or any origin when the list is empty.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin: {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}
