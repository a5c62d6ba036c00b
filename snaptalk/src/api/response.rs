//! # Response Envelope
//!
//! Both extraction endpoints answer with the same flat JSON object:
//!
//! ```json
//! { "success": true,  "extractedText": "...", "message": "...", "processingTime": "< 2 seconds" }
//! { "success": false, "extractedText": "",    "message": "Error extracting text: ..." }
//! { "success": false, "message": "No image data provided" }
//! ```
//!
//! The third shape is used when the request is rejected before any image
//! handling starts. All failure shaping goes through [`ResponseEnvelope::failed`]
//! so the two ingress paths cannot drift apart.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::SnapTalkError;
use crate::models::ExtractionResult;

/// Static latency hint reported on success. Not measured.
pub const PROCESSING_TIME_HINT: &str = "< 2 seconds";

/// Which transport a request arrived on. Only affects message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingress {
    Upload,
    Camera,
}

impl Ingress {
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Upload => "Text extracted successfully",
            Self::Camera => "Text extracted successfully from camera",
        }
    }

    pub fn failure_prefix(self) -> &'static str {
        match self {
            Self::Upload => "Error extracting text",
            Self::Camera => "Error extracting text from camera",
        }
    }

    pub fn missing_input_message(self) -> &'static str {
        match self {
            Self::Upload => "No image file provided",
            Self::Camera => "No image data provided",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    /// Recognized text on success, `""` on a processing failure, absent when the
    /// request was rejected outright.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,

    /// HTTP status to use in the response. Not serialized on the wire.
    #[serde(skip)]
    status: StatusCode,
}

impl ResponseEnvelope {
    pub fn extracted(ingress: Ingress, result: ExtractionResult) -> Self {
        Self {
            success: true,
            extracted_text: Some(result.text),
            message: ingress.success_message().to_string(),
            processing_time: Some(PROCESSING_TIME_HINT.to_string()),
            status: StatusCode::OK,
        }
    }

    /// A request that never reached the pipeline.
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            extracted_text: None,
            message: message.into(),
            processing_time: None,
            status,
        }
    }

    /// Shape any failure for the given ingress.
    pub fn failed(ingress: Ingress, err: &SnapTalkError) -> Self {
        if err.is_rejection() {
            tracing::warn!(ingress = ?ingress, error = %err, "Request rejected");
            return Self::rejected(err.status_code(), err.to_string());
        }

        tracing::error!(ingress = ?ingress, error = %err, "Error during text extraction");
        Self {
            success: false,
            extracted_text: Some(String::new()),
            message: format!("{}: {}", ingress.failure_prefix(), err),
            processing_time: None,
            status: err.status_code(),
        }
    }

    pub fn from_outcome(
        ingress: Ingress,
        outcome: crate::error::Result<ExtractionResult>,
    ) -> Self {
        match outcome {
            Ok(result) => Self::extracted(ingress, result),
            Err(err) => Self::failed(ingress, &err),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
