use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Picture;

/// Login session. Carries a copy of the user's picture so clients can render
/// the avatar without fetching the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub session_id: String,
    pub user_id: Uuid,
    pub picture: Option<Picture>,
    pub expires_at: NaiveDateTime,
}

impl Session {
    pub fn new(user_id: Uuid, ttl: chrono::Duration) -> Self {
        Self {
            session_id: Uuid::new_v4().simple().to_string(),
            user_id,
            picture: None,
            expires_at: chrono::Utc::now().naive_utc() + ttl,
        }
    }

    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub session_id: String,
    pub user_id: Uuid,
    pub picture_key: Option<String>,
    pub picture_url: Option<String>,
    pub expires_at: NaiveDateTime,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            user_id: row.user_id,
            picture: Picture::from_columns(row.picture_key, row.picture_url),
            expires_at: row.expires_at,
        }
    }
}
