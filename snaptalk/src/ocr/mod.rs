//! OCR (Optical Character Recognition) Module
//!
//! Two halves:
//! - `decode` turns wire bytes (raw or base64) into a [`DecodedImage`](crate::models::DecodedImage)
//! - `provider` owns the process-wide Tesseract handle behind the
//!   [`TextRecognizer`] trait
//!
//! # Configuration
//!
//! Recognition settings come from `OcrConfig` (see `config.rs`). Language and
//! the segmentation/engine modes are fixed; only the tessdata directory can be
//! overridden (`OCR_TESSDATA_DIR` or `--tessdata-dir`).

mod decode;
mod provider;

pub use decode::{decode_base64_payload, decode_image, sniff_media_type, to_engine_png};
pub use provider::{OcrProvider, TextRecognizer};
