//! HTTP handlers for the staff/farmer roster

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::roster::{CreateActorInput, RosterService};
use crate::AppState;
use shared::models::{ActorType, StaffFarmer};

#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    pub actor_type: Option<ActorType>,
}

/// Roster entries, optionally filtered by type
pub async fn list_actors(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<RosterQuery>,
) -> AppResult<Json<Vec<StaffFarmer>>> {
    let service = RosterService::new(state.db);
    let actors = match query.actor_type {
        Some(actor_type) => service.list_by_type(actor_type).await?,
        None => service.list().await?,
    };
    Ok(Json(actors))
}

/// The staff and farmer name lists fed to the purchase/sale forms
#[derive(Debug, Serialize)]
pub struct RosterNames {
    pub staff: Vec<String>,
    pub farmers: Vec<String>,
}

pub async fn list_actor_names(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<RosterNames>> {
    let service = RosterService::new(state.db);
    let (staff, farmers) = service.staff_and_farmer_names().await?;
    Ok(Json(RosterNames { staff, farmers }))
}

/// Add a staff member or farmer
pub async fn create_actor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateActorInput>,
) -> AppResult<Json<StaffFarmer>> {
    tracing::info!(
        "{} adding {} {} to the roster",
        current_user.0.email,
        input.actor_type.as_str(),
        input.name
    );
    let service = RosterService::new(state.db);
    let actor = service.create(input).await?;
    Ok(Json(actor))
}
