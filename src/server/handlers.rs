use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};

use crate::analyzers::DatasetSummary;
use crate::dashboard::{FilterState, Widget};
use crate::error::{DashboardError, Result};
use crate::server::SharedState;
use crate::utils::constants::DOWNLOAD_FILENAME;
use crate::writers::CsvExporter;

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub async fn index(State(state): State<SharedState>) -> Html<String> {
    Html(state.page_html.clone())
}

pub async fn layout(State(state): State<SharedState>) -> Json<Widget> {
    Json(state.layout.clone())
}

pub async fn summary(State(state): State<SharedState>) -> Json<DatasetSummary> {
    Json(state.summary.clone())
}

/// Values the Reset Filters action restores.
pub async fn reset(State(state): State<SharedState>) -> Json<FilterState> {
    debug!("Resetting filters to dataset defaults");
    Json(FilterState::defaults(&state.summary))
}

/// The whole cleaned dataset as a CSV attachment.
pub async fn download(State(state): State<SharedState>) -> Result<Response> {
    let dataset = state.dataset.clone();
    let bytes =
        tokio::task::spawn_blocking(move || CsvExporter::new().to_bytes(dataset.records()))
            .await??;

    debug!("Serving download of {} bytes", bytes.len());
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
        ),
    ];
    Ok((headers, bytes).into_response())
}
