use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::{AuthorizationGate, IdentityProvider, SessionManager};
use crate::error::AppError;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (absent in some test setups)
    pub db: Option<DatabaseConnection>,
    pub sessions: Arc<SessionManager>,
    pub gate: Arc<AuthorizationGate>,
    /// Absent when sign-in is not configured (tests, CLI-only deployments)
    pub identity_provider: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        sessions: SessionManager,
        gate: AuthorizationGate,
    ) -> Self {
        Self {
            db,
            sessions: Arc::new(sessions),
            gate: Arc::new(gate),
            identity_provider: None,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn require_identity_provider(&self) -> Result<&Arc<dyn IdentityProvider>, AppError> {
        self.identity_provider
            .as_ref()
            .ok_or_else(|| AppError::config("identity provider not configured"))
    }
}
