//! Session identity and its signed claim form.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::config::session::SESSION_LIFETIME_SECS;

/// Who a session belongs to, as carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Institutional id (`sid` claim)
    pub subject_id: String,
    /// Human-readable name (`name` claim)
    pub display_name: String,
    /// Client address at issuance (`addr` claim)
    pub bound_address: Option<String>,
    /// Absolute expiry (`exp` claim), whole seconds
    pub expires_at: OffsetDateTime,
}

impl Identity {
    /// A full-length session starting at `now`.
    pub fn starting_at(
        subject_id: impl Into<String>,
        display_name: impl Into<String>,
        bound_address: Option<String>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_name: display_name.into(),
            bound_address,
            expires_at: session_expiry(now),
        }
    }

    /// Same subject and address, with a fresh full-length expiry from `now`.
    pub fn renewed_at(&self, now: OffsetDateTime) -> Self {
        Self {
            expires_at: session_expiry(now),
            ..self.clone()
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// `now + SESSION_LIFETIME_SECS`, truncated to whole seconds so the value
/// survives the round trip through the `exp` claim unchanged.
pub fn session_expiry(now: OffsetDateTime) -> OffsetDateTime {
    let truncated = now - Duration::nanoseconds(i64::from(now.nanosecond()));
    truncated + Duration::seconds(SESSION_LIFETIME_SECS)
}

/// What the identity provider hands us after a successful sign-in, plus the
/// address the callback request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub subject_id: String,
    pub display_name: String,
    pub client_address: Option<String>,
}

/// Claims included in session tokens.
///
/// Claim names are part of the wire contract with existing deployments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub sid: String,
    pub name: String,
    pub addr: Option<String>,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl From<&Identity> for SessionClaims {
    fn from(identity: &Identity) -> Self {
        let exp = identity.expires_at.unix_timestamp();
        Self {
            sid: identity.subject_id.clone(),
            name: identity.display_name.clone(),
            addr: identity.bound_address.clone(),
            iat: exp - SESSION_LIFETIME_SECS,
            exp,
        }
    }
}
