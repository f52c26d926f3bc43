use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::gate::EmptyDirectory;
use crate::auth::{
    AuthorizationGate, DbPrivilegeDirectory, DbSecretSource, IdentityProvider, PrivilegeDirectory,
    SecretSource, SessionManager, SessionTokenCodec,
};
use crate::config::db::DbProfile;
use crate::config::session::SessionConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

enum DbChoice {
    None,
    Profile(DbProfile),
    Connection(DatabaseConnection),
}

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    session_config: SessionConfig,
    db: DbChoice,
    secret_source: Option<Arc<dyn SecretSource>>,
    privileges: Option<Arc<dyn PrivilegeDirectory>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            db: DbChoice::None,
            secret_source: None,
            privileges: None,
            identity_provider: None,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db = DbChoice::Profile(profile);
        self
    }

    /// Use an already-open (and migrated) connection.
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.db = DbChoice::Connection(conn);
        self
    }

    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Defaults to the `settings` table when a database is configured.
    pub fn with_secret_source(mut self, source: Arc<dyn SecretSource>) -> Self {
        self.secret_source = Some(source);
        self
    }

    /// Defaults to the `executives` table when a database is configured,
    /// otherwise nobody is privileged.
    pub fn with_privileges(mut self, directory: Arc<dyn PrivilegeDirectory>) -> Self {
        self.privileges = Some(directory);
        self
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match self.db {
            DbChoice::None => None,
            // single entrypoint: connect (+ migrate in memory)
            DbChoice::Profile(profile) => Some(bootstrap_db(profile).await?),
            DbChoice::Connection(conn) => Some(conn),
        };

        let secret_source: Arc<dyn SecretSource> = match (self.secret_source, &db) {
            (Some(source), _) => source,
            (None, Some(conn)) => Arc::new(DbSecretSource::new(conn.clone())),
            (None, None) => {
                return Err(AppError::config(
                    "a secret source or a database is required to sign sessions",
                ))
            }
        };

        let privileges: Arc<dyn PrivilegeDirectory> = match (self.privileges, &db) {
            (Some(directory), _) => directory,
            (None, Some(conn)) => Arc::new(DbPrivilegeDirectory::new(conn.clone())),
            (None, None) => Arc::new(EmptyDirectory),
        };

        let sessions = SessionManager::new(
            SessionTokenCodec::new(secret_source),
            self.session_config,
        );
        let mut state = AppState::new(db, sessions, AuthorizationGate::new(privileges));
        if let Some(provider) = self.identity_provider {
            state = state.with_identity_provider(provider);
        }
        Ok(state)
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
