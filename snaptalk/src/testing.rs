//! Test doubles shared by unit tests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::error::Result;
use crate::models::DecodedImage;
use crate::ocr::TextRecognizer;

/// Returns a fixed string and counts how often it was asked.
pub struct ScriptedRecognizer {
    text: String,
    pub calls: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn returning(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, _image: &DecodedImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// Derives its "text" from the pixels, so two requests carrying the same raster
/// produce the same output regardless of transport.
pub struct FingerprintRecognizer;

impl TextRecognizer for FingerprintRecognizer {
    fn recognize(&self, image: &DecodedImage) -> Result<String> {
        let checksum = image
            .image()
            .to_rgb8()
            .into_raw()
            .iter()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(*b as u64));
        Ok(format!("{}x{} {:016x}", image.width(), image.height(), checksum))
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 200])
    }));
    let mut output = Vec::new();
    img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .unwrap();
    output
}
