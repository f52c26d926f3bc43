use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;

use super::claims::{Identity, SessionClaims};
use super::secret::{SecretSource, SigningSecret};
use super::session::SessionError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a presented token was not accepted. Every variant means "not signed
/// in"; the distinction only feeds debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Malformed,
    BadSignature,
    Expired,
    AddressMismatch,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::BadSignature => "bad_signature",
            TokenRejection::Expired => "expired",
            TokenRejection::AddressMismatch => "address_mismatch",
        }
    }
}

/// Signs identities into HS256 JWTs and verifies them back.
#[derive(Clone)]
pub struct SessionTokenCodec {
    secrets: Arc<dyn SecretSource>,
    fetch_timeout: Duration,
}

impl SessionTokenCodec {
    pub fn new(secrets: Arc<dyn SecretSource>) -> Self {
        Self {
            secrets,
            fetch_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Fetch the current signing secret, bounded by the fetch timeout.
    pub async fn current_secret(&self) -> Result<SigningSecret, SessionError> {
        tokio::time::timeout(self.fetch_timeout, self.secrets.current())
            .await
            .map_err(|_| SessionError::SecretTimeout(self.fetch_timeout))?
    }

    /// Sign `identity` with the current secret.
    pub async fn issue(&self, identity: &Identity) -> Result<String, SessionError> {
        let secret = self.current_secret().await?;
        Self::issue_with(identity, &secret)
    }

    /// Sign `identity` with an explicit secret.
    pub fn issue_with(identity: &Identity, secret: &SigningSecret) -> Result<String, SessionError> {
        encode(
            &Header::new(ALGORITHM),
            &SessionClaims::from(identity),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| SessionError::Encode(e.to_string()))
    }

    /// Check signature, expiry (against `now`, no leeway) and address
    /// binding, in that order.
    pub fn verify(
        token: &str,
        secret: &SigningSecret,
        observed_address: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<Identity, TokenRejection> {
        // Expiry is checked below against the caller's clock.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenRejection::BadSignature,
            _ => TokenRejection::Malformed,
        })?;

        let expires_at = OffsetDateTime::from_unix_timestamp(claims.exp)
            .map_err(|_| TokenRejection::Malformed)?;
        let identity = Identity {
            subject_id: claims.sid,
            display_name: claims.name,
            bound_address: claims.addr,
            expires_at,
        };

        if identity.is_expired_at(now) {
            return Err(TokenRejection::Expired);
        }
        if identity.bound_address.as_deref() != observed_address {
            return Err(TokenRejection::AddressMismatch);
        }

        Ok(identity)
    }
}
