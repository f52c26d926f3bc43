//! Executive (admin) privilege checks.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use super::claims::Identity;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::logging::security;
use crate::repos::executives;

/// Proof that a subject holds executive privilege.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivilegeRecord {
    pub sid: String,
    pub name: String,
    pub position: Option<String>,
}

impl From<executives::Executive> for PrivilegeRecord {
    fn from(e: executives::Executive) -> Self {
        Self {
            sid: e.sid,
            name: e.name,
            position: e.position,
        }
    }
}

/// Lookup of privileged subjects. `Ok(None)` is the normal "not an
/// executive" answer.
#[async_trait]
pub trait PrivilegeDirectory: Send + Sync {
    async fn find_privileged_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<PrivilegeRecord>, DomainError>;
}

/// Directory backed by the `executives` table.
#[derive(Debug, Clone)]
pub struct DbPrivilegeDirectory {
    db: DatabaseConnection,
}

impl DbPrivilegeDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrivilegeDirectory for DbPrivilegeDirectory {
    async fn find_privileged_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<PrivilegeRecord>, DomainError> {
        let found = executives::find_by_sid(&self.db, subject_id).await?;
        Ok(found.map(PrivilegeRecord::from))
    }
}

/// Nobody is privileged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDirectory;

#[async_trait]
impl PrivilegeDirectory for EmptyDirectory {
    async fn find_privileged_subject(
        &self,
        _subject_id: &str,
    ) -> Result<Option<PrivilegeRecord>, DomainError> {
        Ok(None)
    }
}

#[derive(Clone)]
pub struct AuthorizationGate {
    directory: Arc<dyn PrivilegeDirectory>,
}

impl AuthorizationGate {
    pub fn new(directory: Arc<dyn PrivilegeDirectory>) -> Self {
        Self { directory }
    }

    pub async fn is_privileged(&self, identity: &Identity) -> Result<bool, AppError> {
        Ok(self.lookup(identity).await?.is_some())
    }

    /// The caller's executive record, or the same 404 an unknown route gets.
    pub async fn require_privileged(&self, identity: &Identity) -> Result<PrivilegeRecord, AppError> {
        match self.lookup(identity).await? {
            Some(record) => Ok(record),
            None => {
                security::admin_access_denied(&identity.subject_id);
                Err(AppError::hidden_route())
            }
        }
    }

    async fn lookup(&self, identity: &Identity) -> Result<Option<PrivilegeRecord>, AppError> {
        self.directory
            .find_privileged_subject(&identity.subject_id)
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use portal_test_support::{migrated_memory_db, unique_sid};
    use time::OffsetDateTime;

    use super::*;
    use crate::errors::domain::InfraErrorKind;
    use crate::errors::ErrorCode;

    fn identity(sid: &str) -> Identity {
        Identity::starting_at(sid, "Someone", None, OffsetDateTime::now_utc())
    }

    struct BrokenDirectory;

    #[async_trait]
    impl PrivilegeDirectory for BrokenDirectory {
        async fn find_privileged_subject(
            &self,
            _subject_id: &str,
        ) -> Result<Option<PrivilegeRecord>, DomainError> {
            Err(DomainError::infra(InfraErrorKind::DbUnavailable, "down"))
        }
    }

    #[tokio::test]
    async fn unknown_subject_is_not_privileged() {
        let gate = AuthorizationGate::new(Arc::new(EmptyDirectory));
        assert!(!gate.is_privileged(&identity("s1")).await.unwrap());
    }

    #[tokio::test]
    async fn require_privileged_hides_route() {
        let gate = AuthorizationGate::new(Arc::new(EmptyDirectory));
        let err = gate.require_privileged(&identity("s1")).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn lookup_failure_is_an_error_not_a_denial() {
        let gate = AuthorizationGate::new(Arc::new(BrokenDirectory));

        let err = gate.is_privileged(&identity("s1")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn db_directory_finds_granted_executive() {
        let db = migrated_memory_db().await;
        let sid = unique_sid("exec");
        executives::grant(&db, &sid, "Grace Hopper", Some("Chair"))
            .await
            .unwrap();

        let gate = AuthorizationGate::new(Arc::new(DbPrivilegeDirectory::new(db)));

        let record = gate.require_privileged(&identity(&sid)).await.unwrap();
        assert_eq!(record.sid, sid);
        assert_eq!(record.position.as_deref(), Some("Chair"));
        assert!(!gate.is_privileged(&identity("someone-else")).await.unwrap());
    }

    #[tokio::test]
    async fn revoked_executive_loses_access() {
        let db = migrated_memory_db().await;
        let sid = unique_sid("exec");
        executives::grant(&db, &sid, "Grace Hopper", None).await.unwrap();
        let gate = AuthorizationGate::new(Arc::new(DbPrivilegeDirectory::new(db.clone())));
        assert!(gate.is_privileged(&identity(&sid)).await.unwrap());

        executives::revoke(&db, &sid).await.unwrap();
        assert!(!gate.is_privileged(&identity(&sid)).await.unwrap());
    }
}
