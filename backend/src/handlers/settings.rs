//! HTTP handlers for system settings and shift resolution

use std::collections::HashMap;

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::shift::{taipei_now, ShiftService};
use crate::AppState;
use shared::models::Shift;

/// All system settings
pub async fn list_settings(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<HashMap<String, String>>> {
    let service = ShiftService::new(state.db);
    let settings = service.list_settings().await?;
    Ok(Json(settings))
}

/// Settings update input
#[derive(Debug, Deserialize)]
pub struct UpdateSettingInput {
    pub key: String,
    pub value: String,
}

/// Update a shift-boundary setting
pub async fn update_setting(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateSettingInput>,
) -> AppResult<Json<()>> {
    tracing::info!(
        "{} updating setting {} = {}",
        current_user.0.email,
        input.key,
        input.value
    );
    let service = ShiftService::new(state.db);
    service.update_setting(&input.key, &input.value).await?;
    Ok(Json(()))
}

/// Today's date and the shift covering the current time
#[derive(Debug, Serialize)]
pub struct CurrentShiftResponse {
    pub date: NaiveDate,
    pub shift: Shift,
}

pub async fn current_shift(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<CurrentShiftResponse>> {
    let service = ShiftService::new(state.db);
    let shift = service.current_shift().await?;
    Ok(Json(CurrentShiftResponse {
        date: taipei_now().date_naive(),
        shift,
    }))
}
