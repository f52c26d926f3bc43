//! Minimal server-rendered landing pages behind the page guard.

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::{Executive, SessionUser};
use crate::middleware::{AdminGate, SessionGuard};

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body>{body}<form method=\"post\" action=\"/auth/logout\"><button>Sign out</button></form></body></html>"
    ))
}

async fn home(user: SessionUser) -> Result<HttpResponse, AppError> {
    Ok(page(
        "Member portal",
        format!("<p>Signed in as {}</p>", escape_html(user.name())),
    ))
}

async fn admin(executive: Executive) -> Result<HttpResponse, AppError> {
    let record = executive.0;
    let position = record
        .position
        .as_deref()
        .map(|p| format!(" ({})", escape_html(p)))
        .unwrap_or_default();
    Ok(page(
        "Admin console",
        format!("<p>Executive: {}{}</p>", escape_html(&record.name), position),
    ))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/admin")
            .wrap(AdminGate)
            .wrap(SessionGuard::pages())
            .route(web::get().to(admin)),
    );
    cfg.service(
        web::resource("/")
            .wrap(SessionGuard::pages())
            .route(web::get().to(home)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_escaped() {
        assert_eq!(
            escape_html("<b>O'Neil & co</b>"),
            "&lt;b&gt;O&#39;Neil &amp; co&lt;/b&gt;"
        );
    }
}
