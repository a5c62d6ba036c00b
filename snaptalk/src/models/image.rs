use image::{DynamicImage, GenericImageView, ImageFormat};

/// Placeholder returned instead of an empty string when the engine finds no text.
pub const NO_TEXT_FOUND: &str =
    "No text found in the image. Please try with a clearer image containing text.";

/// Undecoded image bytes as received on the wire.
#[derive(Debug, Clone, Default)]
pub struct RawImagePayload {
    pub bytes: Vec<u8>,
    /// Declared media type, e.g. the multipart part's `Content-Type` or the
    /// media type of a `data:` URL.
    pub media_type: Option<String>,
    /// Filename or origin label, for logging only.
    pub source_hint: Option<String>,
}

impl RawImagePayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: None,
            source_hint: None,
        }
    }

    pub fn with_media_type(mut self, media_type: Option<impl Into<String>>) -> Self {
        self.media_type = media_type.map(Into::into);
        self
    }

    pub fn with_source_hint(mut self, source_hint: Option<impl Into<String>>) -> Self {
        self.source_hint = source_hint.map(Into::into);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Label used in log lines; never influences processing.
    pub fn source_label(&self) -> &str {
        self.source_hint.as_deref().unwrap_or("<unnamed>")
    }
}

/// A raster with non-zero dimensions. Only produced by the image decoder.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl DecodedImage {
    pub(crate) fn new(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self { image, format }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Container format the bytes were decoded from, when it could be detected.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub text: String,
    pub elapsed_millis: u64,
}

impl ExtractionResult {
    /// Trims the engine output and substitutes [`NO_TEXT_FOUND`] when nothing is left.
    pub fn from_engine_output(raw: &str, elapsed_millis: u64) -> Self {
        let trimmed = raw.trim();
        let text = if trimmed.is_empty() {
            NO_TEXT_FOUND.to_string()
        } else {
            trimmed.to_string()
        };

        Self {
            text,
            elapsed_millis,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.text == NO_TEXT_FOUND
    }
}
