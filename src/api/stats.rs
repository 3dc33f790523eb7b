//! Dashboard statistics endpoint

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{error::AppResult, services::stats::StatsResponse};

use super::AuthenticatedUser;

/// Dashboard overview counts
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<StatsResponse>> {
    let today = Utc::now().date_naive();
    let stats = state.services.stats.overview(today).await?;
    Ok(Json(stats))
}
