use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::extractors::SessionUser;

#[derive(Debug, Serialize)]
struct MeResponse<'a> {
    sid: &'a str,
    name: &'a str,
}

async fn me(user: SessionUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(MeResponse {
        sid: user.sid(),
        name: user.name(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me));
}
