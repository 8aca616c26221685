//! Database module
//!
//! The storage collaborator: the `Store` trait, its PostgreSQL and in-memory
//! implementations, connections and migrations.

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod store;

use sqlx::PgPool;

pub use connection::*;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{CompetitionChanges, Store};

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
