// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores calculados dos stores", body = crate::models::dashboard::DashboardSummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.dashboard_service.summary()))
}
