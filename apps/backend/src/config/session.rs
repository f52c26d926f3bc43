//! Session cookie and token policy.

use std::time::Duration;

use super::{bool_var, opt_var};
use crate::error::AppError;

/// Lifetime of a session, in seconds.
///
/// Used both as the signed `exp` offset and as the cookie `Max-Age`; the two
/// must never diverge.
pub const SESSION_LIFETIME_SECS: i64 = 30 * 60;

/// Key of the signing secret row in the `settings` table.
pub const JWT_SECRET_KEY: &str = "jwt_secret";

/// Cookie naming/attribute mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieMode {
    /// Plain `jwt` cookie, usable over http://localhost.
    Development,
    /// `__Host-jwt` cookie: `Secure`, `Path=/`, no `Domain`.
    Hardened,
}

impl CookieMode {
    pub fn cookie_name(self) -> &'static str {
        match self {
            CookieMode::Development => "jwt",
            CookieMode::Hardened => "__Host-jwt",
        }
    }

    pub fn is_secure(self) -> bool {
        matches!(self, CookieMode::Hardened)
    }

    fn parse(value: &str) -> Result<Self, AppError> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(CookieMode::Development),
            "hardened" | "production" | "prod" => Ok(CookieMode::Hardened),
            other => Err(AppError::config(format!(
                "SESSION_COOKIE_MODE must be 'development' or 'hardened', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_mode: CookieMode,
    /// Take the client address from `Forwarded`/`X-Forwarded-For` instead of
    /// the socket peer. Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
    /// Upper bound on a single signing-secret fetch.
    pub secret_fetch_timeout: Duration,
    /// Where unauthenticated page loads are redirected.
    pub login_path: String,
}

impl SessionConfig {
    pub fn new(cookie_mode: CookieMode) -> Self {
        Self {
            cookie_mode,
            trust_proxy_headers: false,
            secret_fetch_timeout: Duration::from_secs(5),
            login_path: "/auth/login".to_string(),
        }
    }

    /// Reads `SESSION_COOKIE_MODE`, `TRUST_PROXY_HEADERS` and
    /// `SECRET_FETCH_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, AppError> {
        let cookie_mode = match opt_var("SESSION_COOKIE_MODE") {
            Some(v) => CookieMode::parse(&v)?,
            None => CookieMode::Hardened,
        };

        let mut config = Self::new(cookie_mode);
        config.trust_proxy_headers = bool_var("TRUST_PROXY_HEADERS", false)?;

        if let Some(ms) = opt_var("SECRET_FETCH_TIMEOUT_MS") {
            let ms = ms.parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "SECRET_FETCH_TIMEOUT_MS must be a number of milliseconds, got '{ms}'"
                ))
            })?;
            config.secret_fetch_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn cookie_name(&self) -> &'static str {
        self.cookie_mode.cookie_name()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(CookieMode::Hardened)
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    fn clear_env() {
        env::remove_var("SESSION_COOKIE_MODE");
        env::remove_var("TRUST_PROXY_HEADERS");
        env::remove_var("SECRET_FETCH_TIMEOUT_MS");
    }

    #[test]
    fn cookie_names_per_mode() {
        assert_eq!(CookieMode::Development.cookie_name(), "jwt");
        assert_eq!(CookieMode::Hardened.cookie_name(), "__Host-jwt");
        assert!(CookieMode::Hardened.is_secure());
        assert!(!CookieMode::Development.is_secure());
    }

    #[test]
    #[serial]
    fn from_env_defaults_to_hardened() {
        clear_env();
        let config = SessionConfig::from_env().unwrap();
        assert_eq!(config.cookie_mode, CookieMode::Hardened);
        assert!(!config.trust_proxy_headers);
        assert_eq!(config.secret_fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        clear_env();
        env::set_var("SESSION_COOKIE_MODE", "development");
        env::set_var("TRUST_PROXY_HEADERS", "yes");
        env::set_var("SECRET_FETCH_TIMEOUT_MS", "250");

        let config = SessionConfig::from_env().unwrap();
        assert_eq!(config.cookie_mode, CookieMode::Development);
        assert!(config.trust_proxy_headers);
        assert_eq!(config.secret_fetch_timeout, Duration::from_millis(250));
        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_rejects_unknown_mode() {
        clear_env();
        env::set_var("SESSION_COOKIE_MODE", "lax");
        assert!(SessionConfig::from_env().is_err());
        clear_env();
    }
}
