//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, clients, contracts, equipment, health, maintenance, stats, users};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LiftDesk API",
        version = "0.3.0",
        description = "Fleet Management REST API for forklift and crane rentals",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&BearerAuth),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::schedule_maintenance,
        equipment::delete_equipment,
        // Contracts
        contracts::list_contracts,
        contracts::get_contract,
        contracts::create_contract,
        contracts::terminate_contract,
        contracts::sweep_contracts,
        contracts::contract_summary,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::create_maintenance,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Clients
            crate::models::client::Client,
            crate::models::client::CreateClient,
            crate::models::client::UpdateClient,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::ScheduleMaintenance,
            // Contracts
            crate::models::contract::Contract,
            crate::models::contract::CreateContract,
            crate::models::contract::ContractState,
            crate::models::contract::ContractSummary,
            // Maintenance
            crate::models::maintenance::MaintenanceRecord,
            crate::models::maintenance::CreateMaintenanceRecord,
            // Users
            crate::models::user::Role,
            crate::models::user::UserProfile,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Misc
            crate::services::stats::StatsResponse,
            crate::api::health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Authentication"),
        (name = "clients", description = "Client management"),
        (name = "equipment", description = "Equipment fleet"),
        (name = "contracts", description = "Rental contract lifecycle"),
        (name = "maintenance", description = "Maintenance records"),
        (name = "users", description = "Console user accounts"),
        (name = "stats", description = "Dashboard statistics"),
    )
)]
pub struct ApiDoc;

/// Router serving the Swagger UI and the OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}
