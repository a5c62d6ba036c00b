use axum::Json;
use utoipa::OpenApi;

use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SnapTalk OCR API",
        version = "1.0.0",
        description = "Extract text from uploaded or camera-captured images.",
    ),
    paths(
        handlers::extract::extract_text,
        handlers::extract::extract_text_camera,
        handlers::health::health_check,
    ),
    components(schemas(
        response::ResponseEnvelope,
        handlers::extract::CameraCaptureRequest,
        handlers::health::HealthData,
    )),
    tags(
        (name = "ocr", description = "Text extraction"),
        (name = "health", description = "Health check"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
