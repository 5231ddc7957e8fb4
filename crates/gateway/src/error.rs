//! HTTP mapping for relay errors.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hookrelay_core::RelayError;
use tracing::{error, warn};

/// Body sent for every internal server error, whatever the cause.
pub const SERVER_ERROR_BODY: &str = "500 error";

/// Wrapper so handlers can return `RelayError` with `?`.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Self(RelayError::UnsupportedMediaType),
            other => Self(RelayError::InvalidPayload(other.body_text())),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RelayError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RelayError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::ChannelNotFound(_)
            | RelayError::Upstream { .. }
            | RelayError::NotConfigured
            | RelayError::MissingField(_)
            | RelayError::SessionNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            warn!(error = %self.0, "Rejected request");
            (status, self.0.to_string()).into_response()
        } else {
            error!(error = %self.0, "Request failed");
            (status, SERVER_ERROR_BODY).into_response()
        }
    }
}
