//! Settings repository (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::settings_sea as settings_adapter;
use crate::errors::domain::DomainError;

/// One row of the key/value settings store.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: time::OffsetDateTime,
}

pub async fn get<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key: &str,
) -> Result<Option<Setting>, DomainError> {
    let row = settings_adapter::find_by_key(conn, key).await?;
    Ok(row.map(Setting::from))
}

/// Return the value stored under `key`, creating it with `init()` first if
/// the key is absent. `init` only runs when the row is missing; the stored
/// value wins if another writer got there first.
pub async fn get_or_create<C, F>(conn: &C, key: &str, init: F) -> Result<Setting, DomainError>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce() -> String,
{
    if let Some(existing) = get(conn, key).await? {
        return Ok(existing);
    }

    let (row, inserted) = settings_adapter::insert_if_absent(conn, key, &init()).await?;
    if inserted {
        tracing::info!(setting = key, "setting_created");
    }
    Ok(Setting::from(row))
}

/// Insert or replace `key`.
pub async fn put<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key: &str,
    value: &str,
) -> Result<(), DomainError> {
    settings_adapter::upsert(conn, key, value).await?;
    Ok(())
}

impl From<crate::entities::settings::Model> for Setting {
    fn from(model: crate::entities::settings::Model) -> Self {
        Self {
            key: model.key,
            value: model.value,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use portal_test_support::migrated_memory_db;

    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let db = migrated_memory_db().await;
        assert_eq!(get(&db, "absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_or_create_only_initialises_once() {
        let db = migrated_memory_db().await;

        let first = get_or_create(&db, "greeting", || "hello".to_string())
            .await
            .unwrap();
        let second = get_or_create(&db, "greeting", || panic!("must not run"))
            .await
            .unwrap();

        assert_eq!(first.value, "hello");
        assert_eq!(second.value, "hello");
    }

    #[tokio::test]
    async fn put_overwrites_existing_value() {
        let db = migrated_memory_db().await;
        put(&db, "greeting", "hello").await.unwrap();
        put(&db, "greeting", "bonjour").await.unwrap();

        let row = get(&db, "greeting").await.unwrap().unwrap();
        assert_eq!(row.value, "bonjour");
    }
}
