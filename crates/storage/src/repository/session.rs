use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::{Picture, Session, SessionRow, UpdateResult};

pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a session that has not expired yet
    pub async fn find_active(&self, session_id: &str) -> Result<Session> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, user_id, picture_key, picture_url, expires_at
            FROM sessions
            WHERE session_id = $1
              AND expires_at > (NOW() AT TIME ZONE 'utc')
            "#,
        )
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    pub async fn update_picture(&self, session_id: &str, picture: &Picture) -> Result<UpdateResult> {
        let result = sqlx::query(
            "UPDATE sessions SET picture_key = $2, picture_url = $3 WHERE session_id = $1",
        )
        .bind(session_id)
        .bind(&picture.picture_key)
        .bind(&picture.picture_url)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(UpdateResult::from_rows_affected(result.rows_affected()))
    }
}
