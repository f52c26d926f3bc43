//! Executive-only scopes.
//!
//! Wrap *inside* [`SessionGuard`](super::session_guard::SessionGuard): it
//! reads the [`Identity`] the guard stored. Callers who are not executives
//! get the plain 404 any unknown route gets. The denial is returned as a
//! response rather than an error so the outer guard still attaches the
//! refreshed session cookie.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{Identity, PrivilegeRecord};
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct AdminGate;

impl<S, B> Transform<S, ServiceRequest> for AdminGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = AppError::internal("AppState not available");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let identity = req.extensions().get::<Identity>().cloned();
            let Some(identity) = identity else {
                return Ok(req
                    .error_response(AppError::unauthorized())
                    .map_into_right_body());
            };

            match state.gate.require_privileged(&identity).await {
                Ok(record) => {
                    req.extensions_mut().insert::<PrivilegeRecord>(record);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
