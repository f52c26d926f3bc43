//! In-memory SQLite database with the portal schema applied.

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Open a fresh in-memory SQLite database and run all migrations.
///
/// The pool is pinned to a single connection: every SQLite `:memory:`
/// connection is a separate database.
pub async fn migrated_memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("in-memory sqlite should open");
    migrate(&db, MigrationCommand::Up)
        .await
        .expect("migrations should apply to in-memory sqlite");
    db
}
