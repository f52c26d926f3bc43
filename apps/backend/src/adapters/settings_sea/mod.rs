//! SeaORM adapter for the generic `settings` key/value table.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};

use crate::entities::settings;

// Adapter functions return DbErr; repos map to DomainError via From<DbErr>.

pub async fn find_by_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key: &str,
) -> Result<Option<settings::Model>, sea_orm::DbErr> {
    settings::Entity::find_by_id(key.to_string()).one(conn).await
}

/// Insert `key = value` unless the key already exists, then return the
/// stored row. Concurrent callers all observe the first writer's value.
pub async fn insert_if_absent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key: &str,
    value: &str,
) -> Result<(settings::Model, bool), sea_orm::DbErr> {
    let row = settings::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };

    let rows = settings::Entity::insert(row)
        .on_conflict(
            OnConflict::column(settings::Column::Key)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let stored = find_by_key(conn, key)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("settings.key={key}")))?;

    Ok((stored, rows == 1))
}

/// Insert or overwrite `key`.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    key: &str,
    value: &str,
) -> Result<(), sea_orm::DbErr> {
    let row = settings::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };

    settings::Entity::insert(row)
        .on_conflict(
            OnConflict::column(settings::Column::Key)
                .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
