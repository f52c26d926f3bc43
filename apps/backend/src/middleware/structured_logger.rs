//! One `request_completed` event per request.
//!
//! Wrap inside [`RequestTrace`](super::RequestTrace) so the trace id is
//! available. The signed-in subject (if a guard ran and accepted the session)
//! is included as `sid`; display names are never logged.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;
use crate::auth::Identity;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

struct Completed {
    method: String,
    path: String,
    trace_id: String,
    sid: Option<String>,
    status: StatusCode,
    duration_ms: u64,
}

impl Completed {
    fn emit(&self) {
        let sid = self.sid.as_deref().unwrap_or("-");
        let status = self.status.as_u16();
        if self.status.is_server_error() {
            error!(method = %self.method, path = %self.path, status, duration_ms = self.duration_ms, trace_id = %self.trace_id, sid, "request_completed");
        } else if self.status.is_client_error() {
            warn!(method = %self.method, path = %self.path, status, duration_ms = self.duration_ms, trace_id = %self.trace_id, sid, "request_completed");
        } else {
            info!(method = %self.method, path = %self.path, status, duration_ms = self.duration_ms, trace_id = %self.trace_id, sid, "request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
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
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // The guards store the verified identity in the shared request
            // extensions, so it is visible here after the inner call.
            let (status, sid) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request()
                        .extensions()
                        .get::<Identity>()
                        .map(|i| i.subject_id.clone()),
                ),
                Err(err) => (err.as_response_error().status_code(), None),
            };

            Completed {
                method,
                path,
                trace_id,
                sid,
                status,
                duration_ms: start.elapsed().as_millis() as u64,
            }
            .emit();

            result
        })
    }
}
