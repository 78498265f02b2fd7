use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Error, Debug)]
pub enum DbInitError {
    #[error("Failed to create database pool: {0}")]
    Pool(#[from] r2d2::PoolError),

    #[error("Failed to run database migrations: {0}")]
    Migrations(String),
}

/// Build the connection pool and run pending migrations.
pub fn create_pool(database_url: &str) -> Result<DbPool, DbInitError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().build(manager)?;

    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbInitError::Migrations(e.to_string()))?;
    for version in applied {
        tracing::info!(%version, "applied migration");
    }

    Ok(pool)
}

/// Round-trip a trivial query; used by `/healthz`.
pub fn ping(pool: &DbPool) -> Result<(), String> {
    let mut conn = pool.get().map_err(|e| e.to_string())?;
    diesel::sql_query("SELECT 1")
        .execute(&mut conn)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Check out a pooled connection, converting failure into an [`AppError`](crate::error::AppError).
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        $pool.get().map_err($crate::error::AppError::from)?
    };
}
