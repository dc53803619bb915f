//! Dashboard settings handler

use axum::{extract::State, Json};
use shared::DashboardSettings;

use crate::AppState;

/// Initial slider positions and country aliases for the browser binding
pub async fn get_dashboard_settings(State(state): State<AppState>) -> Json<DashboardSettings> {
    Json(state.config.dashboard.settings())
}
