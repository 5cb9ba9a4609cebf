use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{DetailKind, Picture, UpdateResult, User, UserRow};

const USER_COLUMNS: &str = "user_id, name, bio, finished, picture_key, picture_url, \
                            org_id, athlete_id, created_at";

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users, oldest first
    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, user_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Set name and bio and flag the profile as finished
    pub async fn finish_profile(&self, id: Uuid, name: &str, bio: &str) -> Result<UpdateResult> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                bio = $3,
                finished = TRUE
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(bio)
        .execute(self.pool)
        .await?;

        Ok(UpdateResult::from_rows_affected(result.rows_affected()))
    }

    pub async fn update_picture(&self, id: Uuid, picture: &Picture) -> Result<UpdateResult> {
        let result = sqlx::query(
            "UPDATE users SET picture_key = $2, picture_url = $3 WHERE user_id = $1",
        )
        .bind(id)
        .bind(&picture.picture_key)
        .bind(&picture.picture_url)
        .execute(self.pool)
        .await?;

        Ok(UpdateResult::from_rows_affected(result.rows_affected()))
    }

    /// Conditional link: the guard lives in the WHERE clause so two racing
    /// attaches cannot both win.
    pub async fn link_detail(
        &self,
        id: Uuid,
        kind: DetailKind,
        detail_id: Uuid,
    ) -> Result<UpdateResult> {
        let query = match kind {
            DetailKind::Org => {
                "UPDATE users SET org_id = $2 WHERE user_id = $1 AND org_id IS NULL"
            }
            DetailKind::Athlete => {
                "UPDATE users SET athlete_id = $2 \
                 WHERE user_id = $1 AND org_id IS NULL AND athlete_id IS NULL"
            }
        };

        let result = sqlx::query(query)
            .bind(id)
            .bind(detail_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            if self.exists(id).await? {
                return Err(StorageError::ConstraintViolation(format!(
                    "user {} can no longer be linked to an {}",
                    id, kind
                )));
            }
            return Err(StorageError::NotFound);
        }

        Ok(UpdateResult::from_rows_affected(result.rows_affected()))
    }
}
