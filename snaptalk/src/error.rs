use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ResponseEnvelope;

#[derive(Error, Debug)]
pub enum SnapTalkError {
    /// A required request field was absent or empty.
    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Validation(String),

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("OCR engine failure: {0}")]
    Recognition(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl SnapTalkError {
    /// Only failures detected before the pipeline runs are reported as client
    /// errors. Everything the pipeline raises shares one server-error status,
    /// whether the image was bad or the engine failed.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SnapTalkError::MissingInput(_) | SnapTalkError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            SnapTalkError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SnapTalkError::Validation(_)
            | SnapTalkError::Decode(_)
            | SnapTalkError::Recognition(_)
            | SnapTalkError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures detected while reading the request, before any
    /// image handling started.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SnapTalkError::MissingInput(_)
                | SnapTalkError::InvalidRequest(_)
                | SnapTalkError::PayloadTooLarge(_)
        )
    }
}

impl IntoResponse for SnapTalkError {
    fn into_response(self) -> Response {
        ResponseEnvelope::rejected(self.status_code(), self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SnapTalkError>;
