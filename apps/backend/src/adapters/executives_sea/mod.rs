//! SeaORM adapter for the `executives` table.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use crate::entities::executives;

pub mod dto;

pub use dto::ExecutiveCreate;

pub async fn find_by_sid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sid: &str,
) -> Result<Option<executives::Model>, sea_orm::DbErr> {
    executives::Entity::find_by_id(sid.to_string()).one(conn).await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ExecutiveCreate,
) -> Result<executives::Model, sea_orm::DbErr> {
    let row = executives::ActiveModel {
        sid: Set(dto.sid),
        name: Set(dto.name),
        position: Set(dto.position),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    row.insert(conn).await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_by_sid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sid: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = executives::Entity::delete_by_id(sid.to_string())
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
