//! External identity provider (OAuth2 authorization-code flow).

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::oauth::OAuthConfig;
use crate::error::AppError;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Who the provider says signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub subject_id: String,
    pub display_name: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start signing in.
    fn authorize_url(&self, state: &str) -> String;

    /// Trade an authorization code for the signed-in identity.
    async fn exchange(&self, code: &str) -> Result<ProviderIdentity, AppError>;
}

pub struct OAuthIdentityProvider {
    config: OAuthConfig,
    authorize_url: Url,
    client: Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl OAuthIdentityProvider {
    pub fn new(config: OAuthConfig) -> Result<Self, AppError> {
        let authorize_url = Url::parse(&config.authorize_url)
            .map_err(|e| AppError::config(format!("OAUTH_AUTHORIZE_URL is not a URL: {e}")))?;
        Url::parse(&config.token_url)
            .map_err(|e| AppError::config(format!("OAUTH_TOKEN_URL is not a URL: {e}")))?;
        Url::parse(&config.userinfo_url)
            .map_err(|e| AppError::config(format!("OAUTH_USERINFO_URL is not a URL: {e}")))?;

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            authorize_url,
            client,
        })
    }

    async fn access_token(&self, code: &str) -> Result<String, AppError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::identity_exchange(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "oauth_token_rejected");
            return Err(AppError::identity_exchange(format!(
                "{} - {status}, {body}",
                self.config.token_url
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::identity_exchange(format!("bad token response: {e}")))?;
        Ok(token.access_token)
    }

    async fn userinfo(&self, access_token: &str) -> Result<Value, AppError> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::identity_exchange(format!("userinfo request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "oauth_userinfo_rejected");
            return Err(AppError::identity_exchange(format!(
                "{} - {status}",
                self.config.userinfo_url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::identity_exchange(format!("bad userinfo response: {e}")))
    }
}

#[async_trait]
impl IdentityProvider for OAuthIdentityProvider {
    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("state", state);
        url.into()
    }

    async fn exchange(&self, code: &str) -> Result<ProviderIdentity, AppError> {
        let access_token = self.access_token(code).await?;
        let info = self.userinfo(&access_token).await?;

        let identity = identity_from_userinfo(
            &info,
            &self.config.subject_field,
            &self.config.name_field,
        )?;
        debug!(sid = %identity.subject_id, "oauth_exchange_ok");
        Ok(identity)
    }
}

/// Pull the configured id and name fields out of a userinfo document.
/// Numeric ids are accepted and rendered as strings.
fn identity_from_userinfo(
    info: &Value,
    subject_field: &str,
    name_field: &str,
) -> Result<ProviderIdentity, AppError> {
    let subject_id = match info.get(subject_field) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(AppError::identity_exchange(format!(
                "userinfo has no usable '{subject_field}' field"
            )))
        }
    };

    let display_name = info
        .get(name_field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(subject_id.as_str())
        .to_string();

    Ok(ProviderIdentity {
        subject_id,
        display_name,
    })
}
