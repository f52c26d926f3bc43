//! OAuth2 identity provider settings.

use super::{must_var, opt_var};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Userinfo field holding the institutional id.
    pub subject_field: String,
    /// Userinfo field holding the display name.
    pub name_field: String,
}

impl OAuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            authorize_url: must_var("OAUTH_AUTHORIZE_URL")?,
            token_url: must_var("OAUTH_TOKEN_URL")?,
            userinfo_url: must_var("OAUTH_USERINFO_URL")?,
            client_id: must_var("OAUTH_CLIENT_ID")?,
            client_secret: must_var("OAUTH_CLIENT_SECRET")?,
            redirect_uri: must_var("OAUTH_REDIRECT_URI")?,
            subject_field: opt_var("OAUTH_SUBJECT_FIELD").unwrap_or_else(|| "sub".to_string()),
            name_field: opt_var("OAUTH_NAME_FIELD").unwrap_or_else(|| "name".to_string()),
        })
    }
}
