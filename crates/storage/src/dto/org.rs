use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validation::OrderedValidate;
use crate::models::Org;

/// Request payload for attaching an organization to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateOrgRequest {
    #[validate(length(min = 1, code = "empty", message = "Country is required"))]
    pub country: String,

    #[validate(
        length(min = 1, code = "empty", message = "Email is required"),
        email(code = "invalid_email", message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, code = "empty", message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, code = "empty", message = "Website is required"))]
    pub website: String,

    #[validate(length(min = 1, code = "empty_list", message = "At least one sport is required"))]
    pub sport: Vec<String>,

    pub sponsors: Vec<String>,
}

impl CreateOrgRequest {
    /// Lower-cases the email. Must run before validation.
    pub fn normalize(&mut self) {
        self.email = self.email.to_lowercase();
    }
}

impl OrderedValidate for CreateOrgRequest {
    const FIELD_ORDER: &'static [&'static str] =
        &["country", "email", "city", "website", "sport", "sponsors"];
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachedOrg {
    pub message: String,
    pub id: Uuid,
    pub org: Org,
}

/// Response body of `POST /users/{id}/org`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachOrgResponse {
    pub result: AttachedOrg,
}

impl From<Org> for AttachOrgResponse {
    fn from(org: Org) -> Self {
        Self {
            result: AttachedOrg {
                message: "Org created successfully".to_string(),
                id: org.org_id,
                org,
            },
        }
    }
}
