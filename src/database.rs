use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;
use tracing::info;

use crate::config::Service;

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    /// Pool that opens connections on first use only.
    pub fn connect_lazy(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)?;

        Ok(Database { pool })
    }

    // Each service owns its own schema
    pub async fn run_migrations(&self, service: Service) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running {:?} database migrations...", service);
        match service {
            Service::Booking => sqlx::migrate!("./src/migrations/booking").run(&self.pool).await?,
            Service::Trivia => sqlx::migrate!("./src/migrations/trivia").run(&self.pool).await?,
            Service::Coffee => sqlx::migrate!("./src/migrations/coffee").run(&self.pool).await?,
        }
        info!("Migrations completed");
        Ok(())
    }
}
