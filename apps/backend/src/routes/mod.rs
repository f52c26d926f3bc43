use actix_web::web;

use crate::middleware::{AdminGate, SessionGuard};

pub mod admin;
pub mod auth;
pub mod health;
pub mod me;
pub mod pages;

/// Register every route.
///
/// `main.rs` registers the same pieces individually so it can put the rate
/// limiter on `/auth`; tests use this directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    cfg.service(web::scope("/auth").configure(auth::configure_routes));
    configure_guarded(cfg);
}

/// Routes that require a session. `/api/admin` must be registered before
/// `/api` so the narrower scope wins.
pub fn configure_guarded(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(AdminGate)
            .wrap(SessionGuard::api())
            .configure(admin::configure_routes),
    );
    cfg.service(
        web::scope("/api")
            .wrap(SessionGuard::api())
            .configure(me::configure_routes),
    );
    pages::configure_routes(cfg);
}
