#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use snaptalk::api::{create_router, AppState};
use snaptalk::config::{Config, OcrConfig, ServerConfig};
use snaptalk::error::Result;
use snaptalk::models::DecodedImage;
use snaptalk::ocr::TextRecognizer;

pub const BOUNDARY: &str = "snaptalk-integration-boundary";

/// Records the dimensions of every raster it is handed and answers with a
/// fixed string.
pub struct RecordingRecognizer {
    reply: String,
    pub seen: Mutex<Vec<(u32, u32)>>,
    pub calls: AtomicUsize,
}

impl RecordingRecognizer {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextRecognizer for RecordingRecognizer {
    fn recognize(&self, image: &DecodedImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(image.dimensions());
        Ok(self.reply.clone())
    }
}

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a fixture file as bytes
pub fn load_fixture(name: &str) -> Vec<u8> {
    let path = fixture_path(name);
    fs::read(&path).unwrap_or_else(|e| panic!("Failed to load fixture '{name}': {e}"))
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 10 * 1024 * 1024,
            service_name: "SnapTalk OCR Service".to_string(),
        },
        ocr: OcrConfig::default(),
    }
}

pub fn app_with(recognizer: Arc<dyn TextRecognizer>) -> axum::Router {
    create_router(AppState::new(test_config(), recognizer))
}

/// Checkerboard with a transparent border, encoded in `format`.
pub fn sample_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let rgba = RgbaImage::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 {
            Rgba([0, 0, 0, 0])
        } else if (x / 4 + y / 4) % 2 == 0 {
            Rgba([20, 20, 20, 255])
        } else {
            Rgba([240, 240, 240, 255])
        }
    });

    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    };

    let mut output = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut output), format)
        .expect("encode sample image");
    output
}

pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

pub fn upload_request(field: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nfrom the fridge door\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"scan\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/extract-text")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn camera_request(image: Option<&str>) -> Request<Body> {
    let body = match image {
        Some(image) => serde_json::json!({ "image": image }),
        None => serde_json::json!({}),
    };

    Request::builder()
        .method("POST")
        .uri("/api/extract-text-camera")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
