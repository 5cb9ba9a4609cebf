pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;

use sqlx::{PgPool, postgres::PgPoolOptions};

pub use store::{MemoryStore, ProfileStore};

/// Postgres-backed store. Cheap to clone, the pool is shared.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> error::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> error::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
