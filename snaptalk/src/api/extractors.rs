use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;

use crate::error::SnapTalkError;

/// `axum::Json` whose rejections are answered with the failure envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(SnapTalkError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for SnapTalkError {
    fn from(rejection: JsonRejection) -> Self {
        map_json_rejection(rejection)
    }
}

impl From<MultipartRejection> for SnapTalkError {
    fn from(rejection: MultipartRejection) -> Self {
        SnapTalkError::InvalidRequest(format!("Invalid multipart request: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for SnapTalkError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SnapTalkError::PayloadTooLarge(format!("Image too large: {}", err.body_text()))
        } else {
            SnapTalkError::InvalidRequest(format!("Failed to read multipart body: {}", err.body_text()))
        }
    }
}

fn map_json_rejection(rejection: JsonRejection) -> SnapTalkError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return SnapTalkError::PayloadTooLarge(format!("Image too large: {}", rejection.body_text()));
    }

    match rejection {
        JsonRejection::JsonDataError(err) => {
            SnapTalkError::InvalidRequest(format!("Invalid JSON: {}", err.body_text()))
        }
        JsonRejection::JsonSyntaxError(err) => {
            SnapTalkError::InvalidRequest(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => SnapTalkError::InvalidRequest(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(err) => {
            SnapTalkError::InvalidRequest(format!("Failed to read request body: {}", err.body_text()))
        }
        _ => SnapTalkError::InvalidRequest(rejection.body_text()),
    }
}
