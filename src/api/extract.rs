//! Request extractors that reject with structured errors.

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, ErrorCode};

/// JSON body extractor whose rejections carry a stable error code instead
/// of axum's plain-text parse message.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // The rejection's own message embeds serde parse internals; only the
        // stable code and a generic description cross the boundary.
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Request content type must be application/json"
            }
            _ => "Request body is not valid JSON",
        };
        ApiError::new(ErrorCode::InvalidRequestBody, message)
    }
}
