pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analyzers::DatasetSummary;
use crate::config::LayoutConfig;
use crate::dashboard::{build_layout, render_page, Widget};
use crate::error::{DashboardError, Result};
use crate::models::Dataset;

pub type SharedState = Arc<AppState>;

/// Everything the handlers read. Built once after load, never mutated.
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub summary: DatasetSummary,
    pub layout: Widget,
    pub page_html: String,
}

impl AppState {
    pub fn new(dataset: Dataset, layout_config: &LayoutConfig) -> Result<Self> {
        let summary = DatasetSummary::from_dataset(&dataset)?;
        let layout = build_layout(&summary, layout_config);
        let page_html = render_page(&layout_config.title, &layout);

        Ok(Self {
            dataset: Arc::new(dataset),
            summary,
            layout,
            page_html,
        })
    }
}

pub struct DashboardServer {
    state: SharedState,
    assets_dir: PathBuf,
}

impl DashboardServer {
    pub fn new(state: AppState, assets_dir: &Path) -> Self {
        Self {
            state: Arc::new(state),
            assets_dir: assets_dir.to_path_buf(),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/api/layout", get(handlers::layout))
            .route("/api/summary", get(handlers::summary))
            .route("/api/reset", post(handlers::reset))
            .route("/api/download", get(handlers::download))
            .nest_service("/assets", ServeDir::new(&self.assets_dir))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn serve(self, bind_addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(bind_addr)
            .await
            .map_err(|e| DashboardError::Config(format!("cannot bind {}: {}", bind_addr, e)))?;

        info!(
            "Dashboard listening on http://{} ({} events)",
            listener.local_addr()?,
            self.state.dataset.len()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Dashboard stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
