use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validation::OrderedValidate;
use crate::models::Athlete;

/// Request payload for attaching an athlete profile to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateAthleteRequest {
    #[validate(length(min = 1, code = "empty", message = "Nationality is required"))]
    pub nationality: String,

    #[validate(length(min = 1, code = "empty", message = "Gender is required"))]
    pub gender: String,

    #[validate(length(min = 1, code = "empty", message = "Sport is required"))]
    pub sport: String,

    pub sponsors: Vec<String>,

    #[validate(length(min = 1, code = "empty", message = "Current team is required"))]
    pub current_team: String,

    #[validate(range(
        min = 100,
        max = 200,
        code = "out_of_range",
        message = "Height must be between 100 and 200"
    ))]
    pub height: i32,

    #[validate(range(
        min = 100,
        max = 400,
        code = "out_of_range",
        message = "Weight must be between 100 and 400"
    ))]
    pub weight: i32,

    #[validate(length(min = 1, code = "empty", message = "Achievements are required"))]
    pub achievements: String,

    #[validate(
        length(min = 1, code = "empty", message = "Contact is required"),
        email(code = "invalid_email", message = "Contact must be a valid email")
    )]
    pub contact: String,
}

impl CreateAthleteRequest {
    /// Lower-cases the contact email. Must run before validation.
    pub fn normalize(&mut self) {
        self.contact = self.contact.to_lowercase();
    }
}

impl OrderedValidate for CreateAthleteRequest {
    const FIELD_ORDER: &'static [&'static str] = &[
        "nationality",
        "gender",
        "sport",
        "sponsors",
        "current_team",
        "height",
        "weight",
        "achievements",
        "contact",
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachedAthlete {
    pub message: String,
    pub id: Uuid,
    pub athlete: Athlete,
}

/// Response body of `POST /users/{id}/athlete`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachAthleteResponse {
    pub result: AttachedAthlete,
}

impl From<Athlete> for AttachAthleteResponse {
    fn from(athlete: Athlete) -> Self {
        Self {
            result: AttachedAthlete {
                message: "Athlete created successfully".to_string(),
                id: athlete.athlete_id,
                athlete,
            },
        }
    }
}
