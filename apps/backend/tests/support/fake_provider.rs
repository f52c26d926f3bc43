//! Identity provider double for the sign-in routes.

use async_trait::async_trait;
use portal::auth::{IdentityProvider, ProviderIdentity};
use portal::errors::ErrorCode;
use portal::AppError;

pub const GOOD_CODE: &str = "good-code";
pub const AUTHORIZE_BASE: &str = "https://id.example.test/authorize";

/// Accepts exactly [`GOOD_CODE`] and signs the caller in as `subject`.
pub struct FakeProvider {
    pub subject: String,
    pub name: String,
}

impl FakeProvider {
    pub fn new(subject: &str, name: &str) -> Self {
        Self {
            subject: subject.to_string(),
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorize_url(&self, state: &str) -> String {
        format!("{AUTHORIZE_BASE}?state={state}")
    }

    async fn exchange(&self, code: &str) -> Result<ProviderIdentity, AppError> {
        if code != GOOD_CODE {
            return Err(AppError::bad_request(
                ErrorCode::BadRequest,
                "code rejected by provider",
            ));
        }
        Ok(ProviderIdentity {
            subject_id: self.subject.clone(),
            display_name: self.name.clone(),
        })
    }
}
