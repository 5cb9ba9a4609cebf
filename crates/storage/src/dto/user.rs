use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{FieldViolation, OrderedValidate};
use crate::models::{Picture, UpdateResult, User};

/// Request payload for completing a user's profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct FinishProfileRequest {
    #[validate(length(min = 1, code = "empty", message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, code = "empty", message = "Bio is required"))]
    pub bio: String,
}

impl OrderedValidate for FinishProfileRequest {
    const FIELD_ORDER: &'static [&'static str] = &["name", "bio"];
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct PictureRequest {
    #[serde(rename = "pictureKey")]
    #[validate(length(min = 1, code = "empty", message = "PictureKey is required"))]
    pub picture_key: String,

    #[serde(rename = "pictureURL")]
    #[validate(length(min = 1, code = "empty", message = "PictureURL is required"))]
    pub picture_url: String,
}

impl OrderedValidate for PictureRequest {
    const FIELD_ORDER: &'static [&'static str] = &["picture_key", "picture_url"];
}

/// Request payload for replacing a user's picture
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdatePictureRequest {
    pub picture: Option<PictureRequest>,
}

impl UpdatePictureRequest {
    /// Validates the payload and turns it into a complete picture.
    pub fn into_picture(self) -> Result<Picture, FieldViolation> {
        let picture = self
            .picture
            .ok_or_else(|| FieldViolation::new("picture", "empty", "Picture is required"))?;
        picture.validate_in_order()?;
        Ok(Picture::new(picture.picture_key, picture.picture_url))
    }
}

/// Response body of `GET /users/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserFoundResponse {
    pub message: String,
    pub user: User,
}

impl From<User> for UserFoundResponse {
    fn from(user: User) -> Self {
        Self {
            message: "user found".to_string(),
            user,
        }
    }
}

/// Response body of the profile mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse {
    pub message: String,
    pub user: UpdateResult,
}

impl MutationResponse {
    pub fn success(result: UpdateResult) -> Self {
        Self {
            message: "success".to_string(),
            user: result,
        }
    }
}
