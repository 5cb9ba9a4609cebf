use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Org {
    pub org_id: Uuid,
    pub official: bool,
    pub country: String,
    pub email: String,
    pub city: String,
    pub website: String,
    pub sport: Vec<String>,
    pub sponsors: Vec<String>,
    pub created_at: chrono::NaiveDateTime,
}
