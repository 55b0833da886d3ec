//! HTTP serving layer.
//!
//! `GET /health` is a liveness probe, `GET /body` triggers a scrape and
//! returns the fresh document, `GET /latest` re-serves the last success
//! without scraping. The pipeline is not reentrant against one browser
//! session, so a
//! single-flight guard serializes triggers: a second caller gets
//! `{"status":"running"}` instead of a second scrape. Failures surface as a
//! 500 with an error body, never as a partial document.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ScraperConfig;
use crate::models::OddsFeed;
use crate::pipeline::scrape_site;

/// At-most-one-scrape guard. `try_acquire` hands back an RAII permit; holding
/// it is what makes the scrape exclusive.
pub struct ScrapeGuard {
    busy: Mutex<()>,
}

impl ScrapeGuard {
    pub fn new() -> Self {
        Self { busy: Mutex::new(()) }
    }

    pub fn try_acquire(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        self.busy.try_lock().ok()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.try_lock().is_err()
    }
}

impl Default for ScrapeGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<ScraperConfig>,
    guard: Arc<ScrapeGuard>,
    latest: Arc<RwLock<Option<OddsFeed>>>,
}

pub async fn serve(port: u16, cfg: ScraperConfig) -> anyhow::Result<()> {
    let state = AppState {
        cfg: Arc::new(cfg),
        guard: Arc::new(ScrapeGuard::new()),
        latest: Arc::new(RwLock::new(None)),
    };

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/body", get(body_handler))
        .route("/latest", get(latest_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("scraper API listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "running": state.guard.is_busy() }))
}

/// Last successful document without triggering a new scrape.
async fn latest_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.latest.read().await.clone() {
        Some(feed) => Json(feed).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "no scrape yet" }))).into_response(),
    }
}

async fn body_handler(State(state): State<AppState>) -> impl IntoResponse {
    // Permit is held for the whole scrape and released by drop.
    let Some(_permit) = state.guard.try_acquire() else {
        return Json(json!({ "status": "running" })).into_response();
    };

    match scrape_site(&state.cfg).await {
        Ok(feed) => {
            if let Err(e) = persist(&state.cfg.output_path, &feed).await {
                tracing::warn!("failed to persist {}: {}", state.cfg.output_path, e);
            }
            *state.latest.write().await = Some(feed.clone());
            Json(feed).into_response()
        }
        Err(e) => {
            tracing::error!("scrape failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() })))
                .into_response()
        }
    }
}

/// Write the latest document to durable storage.
pub async fn persist(path: &str, feed: &OddsFeed) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(feed)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_single_flight() {
        let guard = ScrapeGuard::new();
        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());

        drop(permit);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }
}
