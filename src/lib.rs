//! LiftDesk Fleet Management Server
//!
//! A Rust backend for the LiftDesk rental console, providing a REST JSON API
//! for managing clients, equipment units, rental contracts, maintenance
//! records and console users.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
