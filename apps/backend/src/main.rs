use std::sync::Arc;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use portal::auth::OAuthIdentityProvider;
use portal::config::db::DbProfile;
use portal::config::oauth::OAuthConfig;
use portal::config::session::SessionConfig;
use portal::infra::db::bootstrap_db;
use portal::infra::state::build_state;
use portal::middleware::rate_limit::auth_rate_limit_config;
use portal::middleware::{RequestTrace, SecurityHeaders, StructuredLogger};
use portal::{routes, AppError, AppState};

mod telemetry;

async fn build_app_state() -> Result<AppState, AppError> {
    let session_config = SessionConfig::from_env()?;
    let provider = OAuthIdentityProvider::new(OAuthConfig::from_env()?)?;
    let db = bootstrap_db(DbProfile::Prod).await?;

    // Secret source and executive directory default to this connection.
    build_state()
        .with_connection(db)
        .with_session_config(session_config)
        .with_identity_provider(Arc::new(provider))
        .build()
        .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            tracing::error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let app_state = match build_app_state().await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "startup_failed");
            std::process::exit(1);
        }
    };

    tracing::info!(
        host = %host,
        port,
        cookie = app_state.sessions.config().cookie_name(),
        "server_starting"
    );

    let trust_proxy_headers = app_state.sessions.config().trust_proxy_headers;
    let data = web::Data::new(app_state);
    let rate_limit_backend = InMemoryBackend::builder().build();

    HttpServer::new(move || {
        let auth_limiter = RateLimiter::builder(
            rate_limit_backend.clone(),
            auth_rate_limit_config(trust_proxy_headers).build(),
        )
        .add_headers()
        .build();

        App::new()
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::health::configure_routes)
            .service(
                web::scope("/auth")
                    .wrap(auth_limiter)
                    .configure(routes::auth::configure_routes),
            )
            .configure(routes::configure_guarded)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
