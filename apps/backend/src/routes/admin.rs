use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::Executive;

async fn whoami(executive: Executive) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(executive.0))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/whoami", web::get().to(whoami));
}
