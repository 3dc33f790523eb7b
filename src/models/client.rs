//! Client (rental customer) model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Client record. Stored under its `id` (the business name) as document key.
///
/// `assigned_equipment_ids` carries set semantics: no duplicates, order
/// irrelevant. Every id in it must belong to an equipment unit whose
/// `assigned_client_id` points back at this client.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Client {
    /// Business name, human-assigned, unique
    pub id: String,
    pub contact_person: String,
    pub phone: String,
    pub contact_email: String,
    #[serde(default)]
    pub assigned_equipment_ids: Vec<String>,
}

/// Create client request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    /// Business name, used as the record key
    #[validate(length(min = 1, message = "Business name must not be empty"))]
    pub id: String,
    pub contact_person: String,
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: String,
}

/// Update client request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub contact_email: Option<String>,
}
