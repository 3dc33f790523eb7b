//! Maintenance record endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::maintenance::{CreateMaintenanceRecord, MaintenanceQuery, MaintenanceRecord},
};

use super::AuthenticatedUser;

/// List maintenance records, optionally filtered by client
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(MaintenanceQuery),
    responses(
        (status = 200, description = "Maintenance records", body = Vec<MaintenanceRecord>)
    )
)]
pub async fn list_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<MaintenanceQuery>,
) -> AppResult<Json<Vec<MaintenanceRecord>>> {
    let records = state
        .services
        .maintenance
        .list(query.client_id.as_deref())
        .await?;
    Ok(Json(records))
}

/// Record a maintenance intervention
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceRecord,
    responses(
        (status = 201, description = "Maintenance recorded", body = MaintenanceRecord),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn create_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateMaintenanceRecord>,
) -> AppResult<(StatusCode, Json<MaintenanceRecord>)> {
    claims.require_record_maintenance()?;
    let record = state.services.maintenance.create(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
