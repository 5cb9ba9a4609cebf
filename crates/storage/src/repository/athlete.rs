use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::athlete::CreateAthleteRequest;
use crate::error::{Result, StorageError};
use crate::models::Athlete;

pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new athlete profile
    pub async fn create(&self, req: &CreateAthleteRequest) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(
            r#"
            INSERT INTO athletes (nationality, gender, sport, sponsors, current_team,
                                  height, weight, achievements, contact)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING athlete_id, nationality, gender, sport, sponsors, current_team,
                      height, weight, achievements, contact, created_at
            "#,
        )
        .bind(&req.nationality)
        .bind(&req.gender)
        .bind(&req.sport)
        .bind(&req.sponsors)
        .bind(&req.current_team)
        .bind(req.height)
        .bind(req.weight)
        .bind(&req.achievements)
        .bind(&req.contact)
        .fetch_one(self.pool)
        .await?;

        Ok(athlete)
    }

    /// Find athlete by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(
            r#"
            SELECT athlete_id, nationality, gender, sport, sponsors, current_team,
                   height, weight, achievements, contact, created_at
            FROM athletes
            WHERE athlete_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(athlete)
    }

    /// Delete an athlete by ID
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM athletes WHERE athlete_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
