//! Equipment management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::equipment::{
        CreateEquipment, Equipment, EquipmentDetails, ScheduleMaintenance, UpdateEquipment,
    },
};

use super::AuthenticatedUser;

/// List all equipment units
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(equipment))
}

/// Get a unit with its maintenance history
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentDetails),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<EquipmentDetails>> {
    let details = state.services.equipment.get_details(&id).await?;
    Ok(Json(details))
}

/// Register a unit
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment registered", body = Equipment),
        (status = 409, description = "Unit id already taken")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_manage_fleet()?;
    let equipment = state.services.equipment.create(request).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update a unit
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Unit id")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_manage_fleet()?;
    let equipment = state.services.equipment.update(&id, request).await?;
    Ok(Json(equipment))
}

/// Set the next maintenance date for a unit
#[utoipa::path(
    put,
    path = "/equipment/{id}/maintenance-schedule",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Unit id")),
    request_body = ScheduleMaintenance,
    responses(
        (status = 200, description = "Maintenance scheduled", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn schedule_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<ScheduleMaintenance>,
) -> AppResult<Json<Equipment>> {
    claims.require_manage_fleet()?;
    let equipment = state
        .services
        .equipment
        .schedule_maintenance(&id, request.next_maintenance)
        .await?;
    Ok(Json(equipment))
}

/// Delete a unit
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Unit id")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment is under an active contract")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_manage_fleet()?;
    state.services.equipment.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
