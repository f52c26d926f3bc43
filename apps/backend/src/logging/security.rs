//! Security-relevant log events with stable `event` names.
//!
//! Rejected sessions and denied admin access are ordinary traffic and log at
//! `debug`; sign-in failures log at `warn`. Display names are never logged.

use tracing::{debug, warn};

use crate::trace_ctx;

/// A presented session cookie did not verify.
pub fn session_rejected(reason: &str, observed_address: Option<&str>) {
    debug!(
        event = "SECURITY_SESSION_REJECTED",
        trace_id = %trace_ctx::trace_id(),
        reason,
        observed_address = observed_address.unwrap_or("-"),
        "Session rejected"
    );
}

/// A signed-in member who is not an executive hit an admin route.
pub fn admin_access_denied(sid: &str) {
    debug!(
        event = "SECURITY_ADMIN_DENIED",
        trace_id = %trace_ctx::trace_id(),
        sid,
        "Admin access denied"
    );
}

/// The sign-in callback could not complete.
pub fn login_failed(reason: &str) {
    warn!(
        event = "SECURITY_LOGIN_FAILED",
        trace_id = %trace_ctx::trace_id(),
        reason,
        "Sign-in failed"
    );
}
