//! Executive (admin) repository.

use sea_orm::ConnectionTrait;

use crate::adapters::executives_sea::{self as executives_adapter, ExecutiveCreate};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// A member who may use the admin console.
#[derive(Debug, Clone, PartialEq)]
pub struct Executive {
    pub sid: String,
    pub name: String,
    pub position: Option<String>,
    pub created_at: time::OffsetDateTime,
}

pub async fn find_by_sid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sid: &str,
) -> Result<Option<Executive>, DomainError> {
    let row = executives_adapter::find_by_sid(conn, sid).await?;
    Ok(row.map(Executive::from))
}

pub async fn grant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sid: &str,
    name: &str,
    position: Option<&str>,
) -> Result<Executive, DomainError> {
    if find_by_sid(conn, sid).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::DuplicateExecutive,
            format!("{sid} is already an executive"),
        ));
    }

    let mut dto = ExecutiveCreate::new(sid, name);
    if let Some(position) = position {
        dto = dto.with_position(position);
    }
    let row = executives_adapter::create(conn, dto).await?;
    Ok(Executive::from(row))
}

pub async fn revoke<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sid: &str,
) -> Result<(), DomainError> {
    match executives_adapter::delete_by_sid(conn, sid).await? {
        0 => Err(DomainError::not_found(
            NotFoundKind::Executive,
            format!("{sid} is not an executive"),
        )),
        _ => Ok(()),
    }
}

impl From<crate::entities::executives::Model> for Executive {
    fn from(model: crate::entities::executives::Model) -> Self {
        Self {
            sid: model.sid,
            name: model.name,
            position: model.position,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use portal_test_support::migrated_memory_db;

    use super::*;

    #[tokio::test]
    async fn grant_then_find() {
        let db = migrated_memory_db().await;
        grant(&db, "s1234567", "Ada", Some("Treasurer")).await.unwrap();

        let exec = find_by_sid(&db, "s1234567").await.unwrap().unwrap();
        assert_eq!(exec.name, "Ada");
        assert_eq!(exec.position.as_deref(), Some("Treasurer"));
    }

    #[tokio::test]
    async fn grant_twice_conflicts() {
        let db = migrated_memory_db().await;
        grant(&db, "s1", "Ada", None).await.unwrap();
        let err = grant(&db, "s1", "Ada", None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ConflictKind::DuplicateExecutive, _)));
    }

    #[tokio::test]
    async fn revoke_unknown_is_not_found() {
        let db = migrated_memory_db().await;
        let err = revoke(&db, "nobody").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(NotFoundKind::Executive, _)));
    }

    #[tokio::test]
    async fn revoke_removes_record() {
        let db = migrated_memory_db().await;
        grant(&db, "s2", "Grace", None).await.unwrap();
        revoke(&db, "s2").await.unwrap();
        assert!(find_by_sid(&db, "s2").await.unwrap().is_none());
    }
}
