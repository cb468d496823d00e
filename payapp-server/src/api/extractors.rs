//! Custom Axum extractors.
//!
//! Provides `FormBody`, which accepts an `application/x-www-form-urlencoded`
//! body and decodes it into an ordered [`FormRecord`] without imposing a
//! schema. Field-level validation is left to the feedback processor.
//!
//! Only a wrong content type is rejected at the HTTP layer. A body that
//! cannot be read is still a delivery and is carried to the handler as an
//! error so it can be answered with `ERROR`.

use axum::{
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use payapp_sdk::form::{self, FORM_CONTENT_TYPE};
use payapp_sdk::{FormRecord, PayAppError};

/// Largest feedback body accepted.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// A decoded form body, or the reason it could not be read.
pub struct FormBody(pub Result<FormRecord, PayAppError>);

/// Errors that can occur while extracting a form body.
#[derive(Debug, thiserror::Error)]
pub enum FormBodyError {
    #[error("expected content type application/x-www-form-urlencoded")]
    UnsupportedContentType,
}

impl IntoResponse for FormBodyError {
    fn into_response(self) -> Response {
        match self {
            FormBodyError::UnsupportedContentType => {
                (StatusCode::BAD_REQUEST, "unsupported content type").into_response()
            }
        }
    }
}

/// Whether a `Content-Type` value names the form encoding. Parameters such
/// as `charset` are ignored.
fn is_form_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

impl<S: Send + Sync> FromRequest<S> for FormBody {
    type Rejection = FormBodyError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_form_content_type);
        if !is_form {
            return Err(FormBodyError::UnsupportedContentType);
        }

        let record = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map(|body_bytes| form::decode(&String::from_utf8_lossy(&body_bytes)))
            .map_err(|e| {
                PayAppError::Validation(format!("failed to read feedback body: {e}"))
            });

        Ok(FormBody(record))
    }
}
