use std::sync::Arc;
use std::time::Instant;

use crate::error::{Result, SnapTalkError};
use crate::models::{ExtractionResult, RawImagePayload};
use crate::ocr::{decode_image, TextRecognizer};

/// validate → decode → recognize → normalize, shared by every ingress.
#[derive(Clone)]
pub struct RecognitionPipeline {
    recognizer: Arc<dyn TextRecognizer>,
}

impl RecognitionPipeline {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { recognizer }
    }

    pub fn recognizer(&self) -> &Arc<dyn TextRecognizer> {
        &self.recognizer
    }

    /// Run the whole pipeline on the calling thread. Decode and recognition are
    /// CPU-bound; async callers should use [`Self::extract_text_blocking`].
    pub fn extract_text(&self, payload: &RawImagePayload) -> Result<ExtractionResult> {
        tracing::info!(
            source = %payload.source_label(),
            bytes = payload.bytes.len(),
            "Starting text extraction"
        );

        validate(payload)?;

        let image = decode_image(&payload.bytes, payload.source_label())?;

        let started = Instant::now();
        let raw = self.recognizer.recognize(&image)?;
        let elapsed_millis = started.elapsed().as_millis() as u64;

        tracing::info!("Text extraction completed in {} ms", elapsed_millis);

        let result = ExtractionResult::from_engine_output(&raw, elapsed_millis);
        if result.is_placeholder() {
            tracing::info!(source = %payload.source_label(), "No text found in image");
        } else {
            tracing::info!(
                "Successfully extracted {} characters",
                result.text.chars().count()
            );
        }

        Ok(result)
    }

    /// Same as [`Self::extract_text`], moved onto Tokio's blocking pool.
    pub async fn extract_text_blocking(&self, payload: RawImagePayload) -> Result<ExtractionResult> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.extract_text(&payload))
            .await
            .map_err(|e| SnapTalkError::Internal(format!("OCR task panicked: {e}")))?
    }
}

fn validate(payload: &RawImagePayload) -> Result<()> {
    if payload.is_empty() {
        return Err(SnapTalkError::Validation(
            "Uploaded file is empty".to_string(),
        ));
    }

    if let Some(media_type) = payload.media_type.as_deref() {
        if !is_image_media_type(media_type) {
            return Err(SnapTalkError::Validation("File must be an image".to_string()));
        }
    }

    Ok(())
}

fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
