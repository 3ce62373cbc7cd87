//! Web Server Module
//! The dashboard route re-fetches the feed and recomputes every derived
//! column on each request; nothing is cached between requests.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::charts::HtmlRenderer;
use crate::data::{DataLoader, MetricDeriver, Snapshot};

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    loader: Arc<DataLoader>,
}

impl AppState {
    pub fn new(loader: DataLoader) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the dashboard until the process is stopped.
pub async fn serve(bind: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);
    info!("Serving dashboard on http://{}", bind);
    let listener = TcpListener::bind(bind)
        .await
        .context("Failed to bind server")?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    match refresh_and_render(&state.loader).await {
        Ok(page) => Ok(Html(page)),
        Err(e) => {
            warn!("Dashboard refresh failed: {e:#}");
            Err((StatusCode::BAD_GATEWAY, format!("Feed refresh failed: {e}")))
        }
    }
}

/// One full view request: fetch, derive, render. A failure at any step
/// fails the view; stale or partial data is never served.
async fn refresh_and_render(loader: &DataLoader) -> Result<String> {
    let raw = loader.fetch().await?;
    let df = MetricDeriver::derive(&raw.df)?;
    info!(rows = df.height(), "Feed refreshed");
    let snapshot = Snapshot {
        df,
        today: raw.today,
    };
    Ok(HtmlRenderer::render_dashboard(&snapshot)?)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    fn unreachable_state() -> AppState {
        let loader =
            DataLoader::new("http://127.0.0.1:9/feed.csv", Duration::from_millis(500)).unwrap();
        AppState::new(loader)
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let app = router(unreachable_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn dashboard_returns_bad_gateway_when_feed_unreachable() {
        let app = router(unreachable_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
