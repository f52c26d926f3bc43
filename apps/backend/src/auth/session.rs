//! Cookie-carried sessions with a sliding expiry.
//!
//! Every authenticated request is answered with a freshly signed token, so a
//! session lives for thirty minutes after the *last* request rather than the
//! first. Anything wrong with a presented token is reported as
//! [`SessionOutcome::Unauthenticated`]; only a failure to obtain the signing
//! secret surfaces as a [`SessionError`].

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use super::claims::{Identity, NewSession};
use super::jwt::{SessionTokenCodec, TokenRejection};
use crate::config::session::{SessionConfig, SESSION_LIFETIME_SECS};
use crate::logging::security;

/// Infrastructure failures while handling a session. These are never shown
/// to the client as "not signed in".
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("signing secret unavailable: {0}")]
    SecretUnavailable(String),
    #[error("signing secret fetch timed out after {0:?}")]
    SecretTimeout(Duration),
    #[error("failed to encode session token: {0}")]
    Encode(String),
}

/// A verified session and the cookie that extends it.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub refreshed: Cookie<'static>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoToken,
    Invalid(TokenRejection),
}

#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Authenticated(Session),
    Unauthenticated(Rejection),
}

impl SessionOutcome {
    /// Whether the request carried a (non-empty) session cookie at all.
    pub fn had_token(&self) -> bool {
        !matches!(self, SessionOutcome::Unauthenticated(Rejection::NoToken))
    }
}

pub struct SessionManager {
    codec: SessionTokenCodec,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(codec: SessionTokenCodec, config: SessionConfig) -> Self {
        let codec = codec.with_fetch_timeout(config.secret_fetch_timeout);
        Self { codec, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn codec(&self) -> &SessionTokenCodec {
        &self.codec
    }

    pub async fn authenticate(&self, req: &HttpRequest) -> Result<SessionOutcome, SessionError> {
        self.authenticate_at(req, OffsetDateTime::now_utc()).await
    }

    pub async fn authenticate_at(
        &self,
        req: &HttpRequest,
        now: OffsetDateTime,
    ) -> Result<SessionOutcome, SessionError> {
        let token = req
            .cookie(self.config.cookie_name())
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());
        let observed = self.observed_address(req);

        self.authenticate_token(token.as_deref(), observed.as_deref(), now)
            .await
    }

    /// Verify `token` and, if it holds, re-sign it with a full lifetime from
    /// `now`. The secret is only fetched when there is a token to check.
    pub async fn authenticate_token(
        &self,
        token: Option<&str>,
        observed_address: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<SessionOutcome, SessionError> {
        let Some(token) = token else {
            return Ok(SessionOutcome::Unauthenticated(Rejection::NoToken));
        };

        let secret = self.codec.current_secret().await?;
        match SessionTokenCodec::verify(token, &secret, observed_address, now) {
            Ok(identity) => {
                let renewed = identity.renewed_at(now);
                let token = SessionTokenCodec::issue_with(&renewed, &secret)?;
                Ok(SessionOutcome::Authenticated(Session {
                    identity: renewed,
                    refreshed: self.session_cookie(token),
                }))
            }
            Err(rejection) => {
                security::session_rejected(rejection.as_str(), observed_address);
                Ok(SessionOutcome::Unauthenticated(Rejection::Invalid(
                    rejection,
                )))
            }
        }
    }

    /// Start a session for a freshly signed-in subject.
    pub async fn establish(
        &self,
        new_session: NewSession,
        now: OffsetDateTime,
    ) -> Result<(Identity, Cookie<'static>), SessionError> {
        let identity = Identity::starting_at(
            new_session.subject_id,
            new_session.display_name,
            new_session.client_address,
            now,
        );
        let token = self.codec.issue(&identity).await?;
        info!(sid = %identity.subject_id, "session_established");

        Ok((identity, self.session_cookie(token)))
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(self.config.cookie_name(), token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.config.cookie_mode.is_secure())
            .max_age(CookieDuration::seconds(SESSION_LIFETIME_SECS))
            .finish()
    }

    /// Overwrites the session cookie with an empty value.
    pub fn logout_cookie(&self) -> Cookie<'static> {
        self.session_cookie(String::new())
    }

    /// Client address as the session binding sees it: the socket peer, or
    /// the proxy-reported client when proxy headers are trusted.
    pub fn observed_address(&self, req: &HttpRequest) -> Option<String> {
        if self.config.trust_proxy_headers {
            let info = req.connection_info();
            if let Some(addr) = info.realip_remote_addr() {
                return Some(host_only(addr));
            }
        }
        req.peer_addr().map(|addr| addr.ip().to_string())
    }
}

fn host_only(addr: &str) -> String {
    if let Ok(sock) = addr.parse::<SocketAddr>() {
        return sock.ip().to_string();
    }
    addr.trim_start_matches('[')
        .trim_end_matches(']')
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::test::TestRequest;
    use async_trait::async_trait;
    use time::Duration as TimeDuration;

    use super::*;
    use crate::auth::claims::session_expiry;
    use crate::auth::secret::{MemorySecretSource, SecretSource, SigningSecret};
    use crate::config::session::CookieMode;

    const PEER: &str = "1.2.3.4:40000";

    fn manager(mode: CookieMode) -> (SessionManager, Arc<MemorySecretSource>) {
        let source = Arc::new(MemorySecretSource::new(b"session-test-secret".to_vec()));
        let codec = SessionTokenCodec::new(source.clone());
        (SessionManager::new(codec, SessionConfig::new(mode)), source)
    }

    fn new_session(addr: Option<&str>) -> NewSession {
        NewSession {
            subject_id: "s100".into(),
            display_name: "Ada".into(),
            client_address: addr.map(str::to_string),
        }
    }

    fn request_with(cookie: Cookie<'static>) -> HttpRequest {
        TestRequest::default()
            .peer_addr(PEER.parse().unwrap())
            .cookie(cookie)
            .to_http_request()
    }

    #[tokio::test]
    async fn no_cookie_is_no_token() {
        let (sessions, source) = manager(CookieMode::Development);
        source.withdraw();
        let req = TestRequest::default()
            .peer_addr(PEER.parse().unwrap())
            .to_http_request();

        // Secret store is down but nothing needs verifying.
        let outcome = sessions.authenticate(&req).await.unwrap();
        assert!(matches!(
            outcome,
            SessionOutcome::Unauthenticated(Rejection::NoToken)
        ));
        assert!(!outcome.had_token());
    }

    #[tokio::test]
    async fn empty_cookie_is_no_token() {
        let (sessions, _) = manager(CookieMode::Development);
        let req = request_with(sessions.logout_cookie());

        let outcome = sessions.authenticate(&req).await.unwrap();
        assert!(!outcome.had_token());
    }

    #[tokio::test]
    async fn established_session_authenticates_and_slides() {
        let (sessions, _) = manager(CookieMode::Development);
        let issued = OffsetDateTime::now_utc();
        let (identity, cookie) = sessions
            .establish(new_session(Some("1.2.3.4")), issued)
            .await
            .unwrap();

        let later = issued + TimeDuration::minutes(20);
        let outcome = sessions
            .authenticate_at(&request_with(cookie), later)
            .await
            .unwrap();

        let SessionOutcome::Authenticated(session) = outcome else {
            panic!("expected an authenticated session");
        };
        assert_eq!(session.identity.subject_id, identity.subject_id);
        assert!(session.identity.expires_at > identity.expires_at);
        assert_eq!(session.identity.expires_at, session_expiry(later));
        assert_eq!(
            (session.identity.expires_at - later.replace_nanosecond(0).unwrap()).whole_seconds(),
            SESSION_LIFETIME_SECS
        );
        assert_eq!(session.refreshed.name(), "jwt");
    }

    #[tokio::test]
    async fn refreshed_cookie_keeps_session_alive_past_original_expiry() {
        let (sessions, _) = manager(CookieMode::Development);
        let issued = OffsetDateTime::now_utc();
        let (_, first) = sessions
            .establish(new_session(Some("1.2.3.4")), issued)
            .await
            .unwrap();

        let t1 = issued + TimeDuration::minutes(25);
        let SessionOutcome::Authenticated(s1) = sessions
            .authenticate_at(&request_with(first.clone()), t1)
            .await
            .unwrap()
        else {
            panic!("first renewal failed");
        };

        let t2 = issued + TimeDuration::minutes(45);
        let renewed = sessions
            .authenticate_at(&request_with(s1.refreshed), t2)
            .await
            .unwrap();
        assert!(matches!(renewed, SessionOutcome::Authenticated(_)));

        let stale = sessions
            .authenticate_at(&request_with(first), t2)
            .await
            .unwrap();
        assert!(matches!(
            stale,
            SessionOutcome::Unauthenticated(Rejection::Invalid(TokenRejection::Expired))
        ));
    }

    #[tokio::test]
    async fn different_peer_is_rejected() {
        let (sessions, _) = manager(CookieMode::Development);
        let (_, cookie) = sessions
            .establish(new_session(Some("9.9.9.9")), OffsetDateTime::now_utc())
            .await
            .unwrap();

        let outcome = sessions.authenticate(&request_with(cookie)).await.unwrap();
        assert!(matches!(
            outcome,
            SessionOutcome::Unauthenticated(Rejection::Invalid(TokenRejection::AddressMismatch))
        ));
        assert!(outcome.had_token());
    }

    #[tokio::test]
    async fn cookie_under_other_mode_name_is_ignored() {
        let (dev, _) = manager(CookieMode::Development);
        let (hardened, _) = manager(CookieMode::Hardened);
        let (_, cookie) = dev
            .establish(new_session(Some("1.2.3.4")), OffsetDateTime::now_utc())
            .await
            .unwrap();

        let outcome = hardened.authenticate(&request_with(cookie)).await.unwrap();
        assert!(!outcome.had_token());
    }

    #[tokio::test]
    async fn withdrawn_secret_is_an_error_not_a_rejection() {
        let (sessions, source) = manager(CookieMode::Development);
        let (_, cookie) = sessions
            .establish(new_session(Some("1.2.3.4")), OffsetDateTime::now_utc())
            .await
            .unwrap();
        source.withdraw();

        let err = sessions
            .authenticate(&request_with(cookie))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::SecretUnavailable(_)));
    }

    struct StalledSource;

    #[async_trait]
    impl SecretSource for StalledSource {
        async fn current(&self) -> Result<SigningSecret, SessionError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(SigningSecret::new(b"late".to_vec()))
        }
    }

    #[tokio::test]
    async fn slow_secret_store_times_out() {
        let mut config = SessionConfig::new(CookieMode::Development);
        config.secret_fetch_timeout = Duration::from_millis(20);
        let sessions =
            SessionManager::new(SessionTokenCodec::new(Arc::new(StalledSource)), config);

        let err = sessions
            .authenticate_token(Some("anything"), None, OffsetDateTime::now_utc())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::SecretTimeout(_)));
    }

    #[test]
    fn hardened_cookie_attributes() {
        let (sessions, _) = manager(CookieMode::Hardened);
        let cookie = sessions.session_cookie("tok".into());

        assert_eq!(cookie.name(), "__Host-jwt");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.domain(), None);
        assert_eq!(
            cookie.max_age(),
            Some(CookieDuration::seconds(SESSION_LIFETIME_SECS))
        );
    }

    #[test]
    fn logout_cookie_matches_session_cookie_shape() {
        let (sessions, _) = manager(CookieMode::Development);
        let cookie = sessions.logout_cookie();

        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(
            cookie.max_age(),
            Some(CookieDuration::seconds(SESSION_LIFETIME_SECS))
        );
    }

    #[test]
    fn observed_address_uses_peer_by_default() {
        let (sessions, _) = manager(CookieMode::Development);
        let req = TestRequest::default()
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("x-forwarded-for", "7.7.7.7"))
            .to_http_request();

        assert_eq!(sessions.observed_address(&req).as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn observed_address_honours_proxy_when_trusted() {
        let source = Arc::new(MemorySecretSource::new(b"k".to_vec()));
        let mut config = SessionConfig::new(CookieMode::Development);
        config.trust_proxy_headers = true;
        let sessions = SessionManager::new(SessionTokenCodec::new(source), config);

        let req = TestRequest::default()
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("x-forwarded-for", "7.7.7.7"))
            .to_http_request();

        assert_eq!(sessions.observed_address(&req).as_deref(), Some("7.7.7.7"));
    }

    #[test]
    fn host_only_strips_ports() {
        assert_eq!(host_only("1.2.3.4:80"), "1.2.3.4");
        assert_eq!(host_only("[::1]:8080"), "::1");
        assert_eq!(host_only("[::1]"), "::1");
        assert_eq!(host_only("10.0.0.1"), "10.0.0.1");
    }
}
