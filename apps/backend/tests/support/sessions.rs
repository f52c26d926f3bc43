//! State and cookie helpers for session tests.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use portal::auth::{MemorySecretSource, NewSession};
use portal::config::session::{CookieMode, SessionConfig};
use portal::infra::state::{build_state, StateBuilder};
use portal::AppState;
use time::{Duration, OffsetDateTime};

pub const TEST_SECRET: &[u8] = b"integration-test-signing-secret";

/// Builder preloaded with an in-process secret and the given cookie mode.
pub fn state_builder(mode: CookieMode) -> (StateBuilder, Arc<MemorySecretSource>) {
    let source = Arc::new(MemorySecretSource::new(TEST_SECRET.to_vec()));
    let builder = build_state()
        .with_session_config(SessionConfig::new(mode))
        .with_secret_source(source.clone());
    (builder, source)
}

pub async fn dev_state() -> (AppState, Arc<MemorySecretSource>) {
    let (builder, source) = state_builder(CookieMode::Development);
    let state = builder.build().await.expect("build state");
    (state, source)
}

/// A session cookie for `sid` as if it had been issued `minutes_ago`.
pub async fn session_cookie(
    state: &AppState,
    sid: &str,
    address: Option<&str>,
    minutes_ago: i64,
) -> Cookie<'static> {
    let issued = OffsetDateTime::now_utc() - Duration::minutes(minutes_ago);
    let (_, cookie) = state
        .sessions
        .establish(
            NewSession {
                subject_id: sid.to_string(),
                display_name: format!("Member {sid}"),
                client_address: address.map(str::to_string),
            },
            issued,
        )
        .await
        .expect("establish session");
    cookie
}
