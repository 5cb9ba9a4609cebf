use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Storage key plus public URL of an uploaded image. Either both are present
/// or the owner has no picture at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Picture {
    #[serde(rename = "pictureKey")]
    pub picture_key: String,
    #[serde(rename = "pictureURL")]
    pub picture_url: String,
}

impl Picture {
    pub fn new(picture_key: impl Into<String>, picture_url: impl Into<String>) -> Self {
        Self {
            picture_key: picture_key.into(),
            picture_url: picture_url.into(),
        }
    }

    /// Rebuilds a picture from its two nullable columns. A half-set pair is
    /// treated as no picture.
    pub fn from_columns(picture_key: Option<String>, picture_url: Option<String>) -> Option<Self> {
        match (picture_key, picture_url) {
            (Some(picture_key), Some(picture_url)) => Some(Self {
                picture_key,
                picture_url,
            }),
            _ => None,
        }
    }
}
