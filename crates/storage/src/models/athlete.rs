use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Athlete {
    pub athlete_id: Uuid,
    pub nationality: String,
    pub gender: String,
    pub sport: String,
    pub sponsors: Vec<String>,
    pub current_team: String,
    pub height: i32,
    pub weight: i32,
    pub achievements: String,
    pub contact: String,
    pub created_at: chrono::NaiveDateTime,
}
