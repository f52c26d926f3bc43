//! Session authentication for a scope.
//!
//! On success the verified [`Identity`] is stored in request extensions and
//! the response carries the refreshed session cookie. Without a valid
//! session, page scopes redirect to the login path and API scopes answer
//! 401. A cookie that was presented but rejected is overwritten with the
//! logout cookie. Secret-store failures become 503.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpResponse, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{Identity, SessionOutcome};
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthenticated {
    RedirectToLogin,
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionGuard {
    on_unauthenticated: OnUnauthenticated,
}

impl SessionGuard {
    /// Browser pages: `302` to the login path.
    pub fn pages() -> Self {
        Self {
            on_unauthenticated: OnUnauthenticated::RedirectToLogin,
        }
    }

    /// JSON endpoints: `401` problem details.
    pub fn api() -> Self {
        Self {
            on_unauthenticated: OnUnauthenticated::Reject,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware {
            service: Rc::new(service),
            on_unauthenticated: self.on_unauthenticated,
        }))
    }
}

pub struct SessionGuardMiddleware<S> {
    service: Rc<S>,
    on_unauthenticated: OnUnauthenticated,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
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
        let on_unauthenticated = self.on_unauthenticated;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = AppError::internal("AppState not available");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let outcome = match state.sessions.authenticate(req.request()).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    return Ok(req.error_response(AppError::from(e)).map_into_right_body());
                }
            };

            let had_token = outcome.had_token();
            match outcome {
                SessionOutcome::Authenticated(session) => {
                    req.extensions_mut().insert::<Identity>(session.identity);

                    let mut res = service.call(req).await?;
                    res.response_mut().add_cookie(&session.refreshed)?;
                    Ok(res.map_into_left_body())
                }
                SessionOutcome::Unauthenticated(_) => {
                    let mut response = match on_unauthenticated {
                        OnUnauthenticated::RedirectToLogin => HttpResponse::Found()
                            .insert_header((header::LOCATION, state.sessions.config().login_path.as_str()))
                            .finish(),
                        OnUnauthenticated::Reject => AppError::unauthorized().error_response(),
                    };
                    if had_token {
                        response.add_cookie(&state.sessions.logout_cookie())?;
                    }
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
