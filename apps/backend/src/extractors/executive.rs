use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::PrivilegeRecord;
use crate::error::AppError;

/// The signed-in executive, as confirmed by `AdminGate`.
///
/// Outside a gated scope this answers 404, the same as a missing route.
#[derive(Debug, Clone)]
pub struct Executive(pub PrivilegeRecord);

impl FromRequest for Executive {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let record = req.extensions().get::<PrivilegeRecord>().cloned();
        ready(record.map(Executive).ok_or_else(AppError::hidden_route))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn missing_record_is_hidden() {
        let req = TestRequest::default().to_http_request();
        let err = Executive::extract(&req).await.unwrap_err();
        assert_eq!(err.status().as_u16(), 404);
    }
}
