use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::Form;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::StoreError;

/// JSON body `{"error": "..."}` sent with every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// JSON body `{"message": "..."}` for expected negative outcomes (404).
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// Errors a handler can return; each maps to a status and an `{error}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // ---
    /// The request body could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    // ---
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::DuplicateTitle(_)) => StatusCode::CONFLICT,
            Self::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status();
        let error = format!("{self:#}");

        if status.is_server_error() {
            tracing::error!(%status, %error, "Request failed");
        } else {
            tracing::debug!(%status, %error, "Request rejected");
        }

        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Extracts `T` from either an HTML form post or a JSON body.
///
/// `application/json` bodies go through serde_json; everything else is read
/// as `application/x-www-form-urlencoded`, which supports repeated keys for
/// list fields.
pub struct FormOrJson<T>(pub T);

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.to_string()))?;
            Ok(Self(value))
        }
    }
}
