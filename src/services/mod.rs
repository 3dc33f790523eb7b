//! Business logic services

pub mod clients;
pub mod contracts;
pub mod equipment;
pub mod maintenance;
pub mod stats;
pub mod users;

use crate::{config::AuthConfig, store::Store};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub clients: clients::ClientsService,
    pub equipment: equipment::EquipmentService,
    pub contracts: contracts::ContractsService,
    pub maintenance: maintenance::MaintenanceService,
    pub users: users::UsersService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services on the given store backend
    pub fn new(store: Store, auth_config: AuthConfig) -> Self {
        Self {
            clients: clients::ClientsService::new(store.clone()),
            equipment: equipment::EquipmentService::new(store.clone()),
            contracts: contracts::ContractsService::new(store.clone()),
            maintenance: maintenance::MaintenanceService::new(store.clone()),
            users: users::UsersService::new(store.clone(), auth_config),
            stats: stats::StatsService::new(store),
        }
    }
}
