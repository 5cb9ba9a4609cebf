use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Picture;

/// The two kinds of detail record a user can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Org,
    Athlete,
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Org => write!(f, "org"),
            Self::Athlete => write!(f, "athlete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub finished: bool,
    pub picture: Option<Picture>,
    pub org_id: Option<Uuid>,
    pub athlete_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}

impl User {
    /// A freshly signed-up user: empty profile, nothing attached.
    pub fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name: String::new(),
            bio: String::new(),
            finished: false,
            picture: None,
            org_id: None,
            athlete_id: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Whether a detail record of `kind` may still be linked.
    ///
    /// An org is refused only when the user already has an org, while an
    /// athlete is refused when either reference is set.
    pub fn can_attach(&self, kind: DetailKind) -> bool {
        match kind {
            DetailKind::Org => self.org_id.is_none(),
            DetailKind::Athlete => self.org_id.is_none() && self.athlete_id.is_none(),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

/// Row shape of the `users` table; the picture lives in two nullable columns.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub finished: bool,
    pub picture_key: Option<String>,
    pub picture_url: Option<String>,
    pub org_id: Option<Uuid>,
    pub athlete_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            bio: row.bio,
            finished: row.finished,
            picture: Picture::from_columns(row.picture_key, row.picture_url),
            org_id: row.org_id,
            athlete_id: row.athlete_id,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_accepts_both_kinds() {
        let user = User::new();
        assert!(user.can_attach(DetailKind::Org));
        assert!(user.can_attach(DetailKind::Athlete));
    }

    #[test]
    fn test_org_blocks_both_kinds() {
        let user = User {
            org_id: Some(Uuid::new_v4()),
            ..User::new()
        };
        assert!(!user.can_attach(DetailKind::Org));
        assert!(!user.can_attach(DetailKind::Athlete));
    }

    #[test]
    fn test_athlete_only_blocks_athlete() {
        let user = User {
            athlete_id: Some(Uuid::new_v4()),
            ..User::new()
        };
        assert!(user.can_attach(DetailKind::Org));
        assert!(!user.can_attach(DetailKind::Athlete));
    }

    #[test]
    fn test_row_conversion_keeps_picture_pair() {
        let row = UserRow {
            user_id: Uuid::new_v4(),
            name: "Ana".into(),
            bio: "Sprinter".into(),
            finished: true,
            picture_key: Some("k".into()),
            picture_url: Some("u".into()),
            org_id: None,
            athlete_id: None,
            created_at: chrono::Utc::now().naive_utc(),
        };
        let user = User::from(row);
        assert_eq!(user.picture, Some(Picture::new("k", "u")));
    }
}
