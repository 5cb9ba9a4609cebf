use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::org::CreateOrgRequest;
use crate::error::{Result, StorageError};
use crate::models::Org;

pub struct OrgRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrgRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new org. Orgs always start out non-official.
    pub async fn create(&self, req: &CreateOrgRequest) -> Result<Org> {
        let org = sqlx::query_as::<_, Org>(
            r#"
            INSERT INTO orgs (official, country, email, city, website, sport, sponsors)
            VALUES (FALSE, $1, $2, $3, $4, $5, $6)
            RETURNING org_id, official, country, email, city, website, sport, sponsors, created_at
            "#,
        )
        .bind(&req.country)
        .bind(&req.email)
        .bind(&req.city)
        .bind(&req.website)
        .bind(&req.sport)
        .bind(&req.sponsors)
        .fetch_one(self.pool)
        .await?;

        Ok(org)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Org> {
        let org = sqlx::query_as::<_, Org>(
            r#"
            SELECT org_id, official, country, email, city, website, sport, sponsors, created_at
            FROM orgs
            WHERE org_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(org)
    }

    /// Delete an org by ID
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM orgs WHERE org_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
