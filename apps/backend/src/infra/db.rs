use std::future::Future;
use std::time::Duration;

use migration::{count_applied_migrations, migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL_MS: u64 = 1_000;

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry_succeeded");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, interval_ms, "connection_retry_failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

fn connect_options(profile: &DbProfile, url: String) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5));

    // Each `:memory:` connection is its own database.
    if *profile == DbProfile::InMemory {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(10).min_connections(1);
    }
    opts
}

/// Open a connection pool for the profile. Does NOT run migrations.
pub async fn connect_db(profile: DbProfile, owner: DbOwner) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile.clone(), owner)?;
    let attempts = if profile == DbProfile::InMemory {
        1
    } else {
        CONNECT_ATTEMPTS
    };

    let (profile_ref, url_ref) = (&profile, &url);
    let conn = retry_connection(
        || async move {
            Database::connect(connect_options(profile_ref, url_ref.clone()))
                .await
                .map_err(AppError::from)
        },
        attempts,
        CONNECT_RETRY_INTERVAL_MS,
    )
    .await?;

    info!(profile = ?profile, "db_connected");
    Ok(conn)
}

/// Connect for serving requests.
///
/// In-memory databases are migrated on the spot; anything else is expected
/// to have been migrated with `portal-cli migrate up`, and an empty
/// migration table only produces a warning.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile.clone(), DbOwner::App).await?;

    if profile == DbProfile::InMemory {
        migrate(&conn, MigrationCommand::Up).await?;
        return Ok(conn);
    }

    match count_applied_migrations(&conn).await {
        Ok(0) => warn!("schema_not_ready: no migrations applied, run `portal-cli migrate up`"),
        Ok(applied) => info!(applied, "schema_ready"),
        Err(e) => warn!(error = %e, "schema_check_failed"),
    }
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use migration::get_latest_migration_version;

    use super::*;

    #[tokio::test]
    async fn in_memory_bootstrap_is_migrated() {
        let conn = bootstrap_db(DbProfile::InMemory).await.unwrap();
        let latest = get_latest_migration_version(&conn).await.unwrap();
        assert!(latest.is_some());
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), AppError> = retry_connection(
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::db("refused"))
            },
            3,
            1,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_returns_first_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry_connection(
            || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(AppError::db("refused"))
                } else {
                    Ok(n)
                }
            },
            5,
            1,
        )
        .await
        .unwrap();

        assert_eq!(result, 1);
    }
}
