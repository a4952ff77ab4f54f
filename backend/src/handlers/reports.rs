//! HTTP handlers for report generation

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{ReportOutput, ReportRequest, ReportingService};
use crate::AppState;

/// Generate the period reports
pub async fn generate_reports(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ReportRequest>,
) -> AppResult<Json<ReportOutput>> {
    tracing::info!("{} requested report generation", current_user.0.email);
    let service = ReportingService::new(state.db, state.config.reports.output_dir.clone());
    let output = service.generate(request).await?;
    Ok(Json(output))
}
