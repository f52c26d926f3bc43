use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::Identity;
use crate::error::AppError;

/// The signed-in member, as verified by `SessionGuard`.
///
/// Only usable in scopes wrapped with the guard; anywhere else it answers
/// 401.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Identity);

impl SessionUser {
    pub fn sid(&self) -> &str {
        &self.0.subject_id
    }

    pub fn name(&self) -> &str {
        &self.0.display_name
    }
}

impl FromRequest for SessionUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<Identity>().cloned();
        ready(identity.map(SessionUser).ok_or_else(AppError::unauthorized))
    }
}
