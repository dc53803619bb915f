//! Dataset handlers
//!
//! Serve the loaded dataset to the dashboard page. Nothing here filters.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::models::CoffeeRecord;
use crate::services::{DatasetService, DatasetSummary};
use crate::AppState;
use shared::FilterOptions;

/// Get dataset summary
pub async fn get_dataset_summary(State(state): State<AppState>) -> Json<DatasetSummary> {
    let service = DatasetService::new(state.dataset.clone());
    Json(service.summary())
}

/// List every record in load order
pub async fn list_records(State(state): State<AppState>) -> Json<Vec<CoffeeRecord>> {
    let service = DatasetService::new(state.dataset.clone());
    Json(service.records().to_vec())
}

/// Get a single record by id
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<usize>,
) -> AppResult<Json<CoffeeRecord>> {
    let service = DatasetService::new(state.dataset.clone());
    let record = service.record(id)?.clone();
    Ok(Json(record))
}

/// Download the dataset as CSV
pub async fn export_dataset_csv(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = DatasetService::new(state.dataset.clone());
    let csv = service.export_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"coffee_quality.csv\""),
        ],
        csv,
    ))
}

/// Get dropdown contents for the categorical controls
pub async fn get_filter_options(State(state): State<AppState>) -> Json<FilterOptions> {
    let service = DatasetService::new(state.dataset.clone());
    Json(service.options().clone())
}
