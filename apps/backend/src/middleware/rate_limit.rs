//! Rate limiting for the sign-in endpoints.

use std::time::Duration;

use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

/// `/auth/*`: 5 requests per 60 seconds per client IP.
///
/// Keyed on the socket peer unless proxy headers are trusted, the same rule
/// `SessionManager::observed_address` follows.
pub fn auth_rate_limit_config(trust_proxy_headers: bool) -> SimpleInputFunctionBuilder {
    let builder = SimpleInputFunctionBuilder::new(Duration::from_secs(60), 5);
    if trust_proxy_headers {
        builder.real_ip_key()
    } else {
        builder.peer_ip_key()
    }
}
