//! Where the session signing secret comes from.
//!
//! The secret lives in the `settings` table under `jwt_secret` and is read on
//! every issue and verification, so a rotation takes effect on the next
//! request without restarting anything.

use std::fmt;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use parking_lot::RwLock;
use rand::RngCore;
use sea_orm::DatabaseConnection;

use super::session::SessionError;
use crate::config::session::JWT_SECRET_KEY;
use crate::repos::settings;

/// Number of random bytes in a generated secret.
const SECRET_BYTES: usize = 48;

/// HMAC key material. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret(<{} bytes>)", self.0.len())
    }
}

/// Fresh random secret, base64url encoded for storage in a text column.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Source of the current signing secret.
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn current(&self) -> Result<SigningSecret, SessionError>;
}

/// Secret read from (and lazily created in) the `settings` table.
#[derive(Debug, Clone)]
pub struct DbSecretSource {
    db: DatabaseConnection,
}

impl DbSecretSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SecretSource for DbSecretSource {
    async fn current(&self) -> Result<SigningSecret, SessionError> {
        let row = settings::get_or_create(&self.db, JWT_SECRET_KEY, generate_secret)
            .await
            .map_err(|e| SessionError::SecretUnavailable(e.to_string()))?;

        if row.value.is_empty() {
            return Err(SessionError::SecretUnavailable(format!(
                "setting '{JWT_SECRET_KEY}' is empty"
            )));
        }
        Ok(SigningSecret::new(row.value.into_bytes()))
    }
}

/// A fixed secret.
#[derive(Debug, Clone)]
pub struct StaticSecret(SigningSecret);

impl StaticSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(SigningSecret::new(secret))
    }
}

#[async_trait]
impl SecretSource for StaticSecret {
    async fn current(&self) -> Result<SigningSecret, SessionError> {
        Ok(self.0.clone())
    }
}

/// In-process secret that can be rotated or withdrawn at runtime.
#[derive(Debug, Default)]
pub struct MemorySecretSource {
    secret: RwLock<Option<SigningSecret>>,
}

impl MemorySecretSource {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: RwLock::new(Some(SigningSecret::new(secret))),
        }
    }

    pub fn rotate(&self, secret: impl Into<Vec<u8>>) {
        *self.secret.write() = Some(SigningSecret::new(secret));
    }

    /// Simulate an unreachable store: every `current()` fails until rotated.
    pub fn withdraw(&self) {
        *self.secret.write() = None;
    }
}

#[async_trait]
impl SecretSource for MemorySecretSource {
    async fn current(&self) -> Result<SigningSecret, SessionError> {
        self.secret
            .read()
            .clone()
            .ok_or_else(|| SessionError::SecretUnavailable("no secret configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use portal_test_support::migrated_memory_db;

    use super::*;

    #[test]
    fn generated_secrets_are_distinct_and_long() {
        let a = generate_secret();
        let b = generate_secret();
        assert_ne!(a, b);
        assert_eq!(URL_SAFE_NO_PAD.decode(&a).unwrap().len(), SECRET_BYTES);
    }

    #[test]
    fn debug_does_not_print_key() {
        let secret = SigningSecret::new(b"hunter2".to_vec());
        assert_eq!(format!("{secret:?}"), "SigningSecret(<7 bytes>)");
    }

    #[tokio::test]
    async fn db_source_creates_secret_once() {
        let db = migrated_memory_db().await;
        let source = DbSecretSource::new(db.clone());

        let first = source.current().await.unwrap();
        let second = source.current().await.unwrap();
        assert_eq!(first, second);

        let stored = settings::get(&db, JWT_SECRET_KEY).await.unwrap().unwrap();
        assert_eq!(stored.value.as_bytes(), first.as_bytes());
    }

    #[tokio::test]
    async fn db_source_sees_rotation_immediately() {
        let db = migrated_memory_db().await;
        let source = DbSecretSource::new(db.clone());
        let before = source.current().await.unwrap();

        settings::put(&db, JWT_SECRET_KEY, "rotated-secret").await.unwrap();

        let after = source.current().await.unwrap();
        assert_ne!(before, after);
        assert_eq!(after.as_bytes(), b"rotated-secret");
    }

    #[tokio::test]
    async fn db_source_rejects_empty_secret() {
        let db = migrated_memory_db().await;
        settings::put(&db, JWT_SECRET_KEY, "").await.unwrap();

        let err = DbSecretSource::new(db).current().await.unwrap_err();
        assert!(matches!(err, SessionError::SecretUnavailable(_)));
    }

    #[tokio::test]
    async fn memory_source_rotate_and_withdraw() {
        let source = MemorySecretSource::new(b"one".to_vec());
        assert_eq!(source.current().await.unwrap().as_bytes(), b"one");

        source.rotate(b"two".to_vec());
        assert_eq!(source.current().await.unwrap().as_bytes(), b"two");

        source.withdraw();
        assert!(source.current().await.is_err());
    }
}
