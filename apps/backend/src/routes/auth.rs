//! Sign-in through the identity provider, and sign-out.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::NewSession;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::security;
use crate::state::app_state::AppState;

const STATE_COOKIE: &str = "oauth_state";
const STATE_COOKIE_PATH: &str = "/auth";
const STATE_LIFETIME_MINUTES: i64 = 10;

fn new_oauth_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Lax, because the provider's redirect back is a cross-site navigation.
fn state_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(STATE_COOKIE, value)
        .path(STATE_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::minutes(STATE_LIFETIME_MINUTES))
        .finish()
}

async fn login(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let provider = app_state.require_identity_provider()?;
    let oauth_state = new_oauth_state();
    let secure = app_state.sessions.config().cookie_mode.is_secure();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, provider.authorize_url(&oauth_state)))
        .cookie(state_cookie(oauth_state, secure))
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

async fn callback(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    if let Some(error) = query.error {
        security::login_failed(&format!("provider_error: {error}"));
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            "Sign-in was not completed",
        ));
    }

    let expected = req
        .cookie(STATE_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());
    match (expected.as_deref(), query.state.as_deref()) {
        (Some(expected), Some(got)) if expected == got => {}
        _ => {
            security::login_failed("state_mismatch");
            return Err(AppError::bad_request(
                ErrorCode::InvalidOauthState,
                "Sign-in state did not match; please try again",
            ))
        }
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request(ErrorCode::MissingParameter, "Missing 'code'"))?;

    let provider = app_state.require_identity_provider()?;
    let who = provider.exchange(&code).await?;

    let sessions = &app_state.sessions;
    let (identity, session_cookie) = sessions
        .establish(
            NewSession {
                subject_id: who.subject_id,
                display_name: who.display_name,
                client_address: sessions.observed_address(&req),
            },
            OffsetDateTime::now_utc(),
        )
        .await?;
    info!(sid = %identity.subject_id, "login_succeeded");

    let mut clear_state = state_cookie(String::new(), sessions.config().cookie_mode.is_secure());
    clear_state.make_removal();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(session_cookie)
        .cookie(clear_state)
        .finish())
}

async fn logout(app_state: web::Data<AppState>) -> HttpResponse {
    let sessions = &app_state.sessions;
    HttpResponse::Found()
        .insert_header((header::LOCATION, sessions.config().login_path.as_str()))
        .cookie(sessions.logout_cookie())
        .finish()
}

/// Mounted under `/auth`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(login))
        .route("/callback", web::get().to(callback))
        .route("/logout", web::get().to(logout))
        .route("/logout", web::post().to(logout));
}
