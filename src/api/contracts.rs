//! Contract lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::contract::{Contract, ContractState, ContractSummary, CreateContract},
};

use super::AuthenticatedUser;

/// Contract list query
#[derive(Deserialize, IntoParams)]
pub struct ContractQuery {
    /// Restrict to active or finished contracts
    pub state: Option<ContractState>,
}

/// List contracts. Runs the expiry sweep first, so contracts past their end
/// date come back already deactivated.
#[utoipa::path(
    get,
    path = "/contracts",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(ContractQuery),
    responses(
        (status = 200, description = "Contract list", body = Vec<Contract>)
    )
)]
pub async fn list_contracts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ContractQuery>,
) -> AppResult<Json<Vec<Contract>>> {
    let today = Utc::now().date_naive();
    let contracts = state.services.contracts.list(today).await?;

    let contracts = match query.state {
        Some(ContractState::Active) => contracts.into_iter().filter(|c| c.active).collect(),
        Some(ContractState::Finished) => contracts.into_iter().filter(|c| !c.active).collect(),
        None => contracts,
    };
    Ok(Json(contracts))
}

/// Get a contract by id
#[utoipa::path(
    get,
    path = "/contracts/{id}",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract details", body = Contract),
        (status = 404, description = "Contract not found")
    )
)]
pub async fn get_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Contract>> {
    let contract = state.services.contracts.get(&id).await?;
    Ok(Json(contract))
}

/// Create a contract, assigning the equipment unit to the client
#[utoipa::path(
    post,
    path = "/contracts",
    tag = "contracts",
    security(("bearer_auth" = [])),
    request_body = CreateContract,
    responses(
        (status = 201, description = "Contract created", body = Contract),
        (status = 404, description = "Client or equipment not found"),
        (status = 422, description = "Equipment already on contract")
    )
)]
pub async fn create_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<Contract>)> {
    claims.require_manage_fleet()?;
    let contract = state.services.contracts.create(request).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// Terminate a contract before its end date. Terminating an already
/// finished contract changes nothing.
#[utoipa::path(
    post,
    path = "/contracts/{id}/terminate",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract terminated", body = Contract),
        (status = 404, description = "Contract not found")
    )
)]
pub async fn terminate_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Contract>> {
    claims.require_manage_fleet()?;
    let contract = state.services.contracts.terminate(&id).await?;
    Ok(Json(contract))
}

/// Run the expiry sweep now, returning the contracts it deactivated
#[utoipa::path(
    post,
    path = "/contracts/sweep",
    tag = "contracts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deactivated contracts", body = Vec<Contract>)
    )
)]
pub async fn sweep_contracts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Contract>>> {
    claims.require_manage_fleet()?;
    let today = Utc::now().date_naive();
    let deactivated = state.services.contracts.sweep_expired(today).await?;
    Ok(Json(deactivated))
}

/// Total and active contract counts
#[utoipa::path(
    get,
    path = "/contracts/summary",
    tag = "contracts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Contract counts", body = ContractSummary)
    )
)]
pub async fn contract_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ContractSummary>> {
    let summary = state.services.contracts.summary().await?;
    Ok(Json(summary))
}
