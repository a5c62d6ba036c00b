//! Text extraction endpoints.
//!
//! Two ingress paths feed the same [`RecognitionPipeline`](crate::processing::RecognitionPipeline):
//! a multipart upload (`image` file field) and a JSON body carrying a base64
//! string, as produced by a browser camera capture.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use serde::Deserialize;

use crate::api::extractors::AppJson;
use crate::api::response::{Ingress, ResponseEnvelope};
use crate::api::state::AppState;
use crate::error::{Result, SnapTalkError};
use crate::models::RawImagePayload;
use crate::ocr::decode_base64_payload;

/// Name of the multipart form field carrying the image.
pub const IMAGE_FIELD: &str = "image";

const CAMERA_SOURCE: &str = "camera";

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct CameraCaptureRequest {
    /// Base64 image data, optionally prefixed with a data URL header
    /// (`data:image/png;base64,`).
    #[serde(default)]
    pub image: Option<String>,
}

/// `POST /api/extract-text`
#[utoipa::path(
    post,
    path = "/api/extract-text",
    tag = "ocr",
    request_body(content_type = "multipart/form-data", content = String, description = "Image file in the `image` form field"),
    responses(
        (status = 200, description = "Text extracted", body = ResponseEnvelope),
        (status = 400, description = "No image field in the form", body = ResponseEnvelope),
        (status = 413, description = "Upload exceeds the size limit", body = ResponseEnvelope),
        (status = 500, description = "Image could not be processed", body = ResponseEnvelope),
    )
)]
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> ResponseEnvelope {
    let ingress = Ingress::Upload;

    let payload = match multipart {
        Ok(multipart) => read_image_field(multipart).await,
        Err(rejection) => Err(rejection.into()),
    };
    let payload = match payload {
        Ok(payload) => payload,
        Err(err) => return ResponseEnvelope::failed(ingress, &err),
    };

    tracing::info!("Received file upload request: {}", payload.source_label());

    let outcome = state.pipeline.extract_text_blocking(payload).await;
    ResponseEnvelope::from_outcome(ingress, outcome)
}

/// `POST /api/extract-text-camera`
#[utoipa::path(
    post,
    path = "/api/extract-text-camera",
    tag = "ocr",
    request_body = CameraCaptureRequest,
    responses(
        (status = 200, description = "Text extracted", body = ResponseEnvelope),
        (status = 400, description = "Missing image data or malformed JSON", body = ResponseEnvelope),
        (status = 413, description = "Payload exceeds the size limit", body = ResponseEnvelope),
        (status = 500, description = "Image could not be processed", body = ResponseEnvelope),
    )
)]
pub async fn extract_text_camera(
    State(state): State<AppState>,
    AppJson(req): AppJson<CameraCaptureRequest>,
) -> ResponseEnvelope {
    let ingress = Ingress::Camera;

    let image = match req.image {
        Some(image) if !image.is_empty() => image,
        _ => {
            let err = SnapTalkError::MissingInput(ingress.missing_input_message().to_string());
            return ResponseEnvelope::failed(ingress, &err);
        }
    };

    tracing::info!("Received camera capture request ({} chars)", image.len());

    let outcome = match decode_base64_payload(&image) {
        Ok(payload) => {
            let payload = payload.with_source_hint(Some(CAMERA_SOURCE));
            state.pipeline.extract_text_blocking(payload).await
        }
        Err(err) => Err(err),
    };
    ResponseEnvelope::from_outcome(ingress, outcome)
}

/// Pull the `image` part out of the form. Other parts are skipped.
async fn read_image_field(mut multipart: Multipart) -> Result<RawImagePayload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        return Ok(RawImagePayload::new(bytes.to_vec())
            .with_media_type(content_type)
            .with_source_hint(file_name));
    }

    Err(SnapTalkError::MissingInput(
        Ingress::Upload.missing_input_message().to_string(),
    ))
}
