//! Security headers middleware
//!
//! Adds to every response:
//! - X-Content-Type-Options: nosniff
//! - X-Frame-Options: DENY
//! - Strict-Transport-Security: max-age=31536000; includeSubDomains
//! - Referrer-Policy: same-origin
//! - Content-Security-Policy (locked down for JSON and auth endpoints)
//! - Permissions-Policy
//!
//! and `Cache-Control: no-store` on anything that may carry session state
//! (`/api/*`, `/auth/*`, `/health`).

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::Error as ActixError;
use futures_util::future::{ready, LocalBoxFuture, Ready};

const STRICT_CSP: &str = "default-src 'none'; frame-ancestors 'none'";
const PAGE_CSP: &str = "default-src 'self'; frame-ancestors 'none'; img-src 'self' data:; style-src 'self' 'unsafe-inline'";

pub struct SecurityHeaders;

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware { service }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: S,
}

fn is_sensitive(path: &str) -> bool {
    path.starts_with("/api/") || path.starts_with("/auth/") || path == "/health"
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let sensitive = is_sensitive(req.path());
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();

            headers.insert(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            );
            headers.insert(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            );
            // Browsers ignore this over plain http, so it is always set.
            headers.insert(
                HeaderName::from_static("strict-transport-security"),
                HeaderValue::from_static("max-age=31536000; includeSubDomains"),
            );
            headers.insert(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("same-origin"),
            );
            headers.insert(
                HeaderName::from_static("permissions-policy"),
                HeaderValue::from_static("geolocation=(), microphone=(), camera=(), payment=()"),
            );

            if sensitive {
                headers.insert(
                    HeaderName::from_static("content-security-policy"),
                    HeaderValue::from_static(STRICT_CSP),
                );
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            } else {
                headers.insert(
                    HeaderName::from_static("content-security-policy"),
                    HeaderValue::from_static(PAGE_CSP),
                );
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpResponse};

    use super::*;

    #[actix_web::test]
    async fn api_responses_are_not_cached() {
        let app = test::init_service(
            App::new()
                .wrap(SecurityHeaders)
                .route("/api/ping", web::get().to(HttpResponse::Ok))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let api = test::call_service(&app, test::TestRequest::get().uri("/api/ping").to_request()).await;
        assert_eq!(api.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(api.headers().get("content-security-policy").unwrap(), STRICT_CSP);
        assert_eq!(api.headers().get("x-frame-options").unwrap(), "DENY");

        let page = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(page.headers().get(header::CACHE_CONTROL).is_none());
        assert_eq!(page.headers().get("content-security-policy").unwrap(), PAGE_CSP);
    }
}
