use std::io::Cursor;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};

use crate::error::{Result, SnapTalkError};
use crate::models::{DecodedImage, RawImagePayload};

/// Standard alphabet, padding optional. Browsers and mobile clients disagree on
/// whether canvas exports are padded.
const BASE64_IMAGE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode raw image bytes into a raster.
///
/// The container format is guessed from the bytes themselves; `source_hint`
/// only appears in log lines.
pub fn decode_image(bytes: &[u8], source_hint: &str) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(SnapTalkError::Decode("no bytes received".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SnapTalkError::Decode(e.to_string()))?;

    let format = reader.format();
    if format.is_none() {
        let detected = sniff_media_type(bytes).unwrap_or("unknown");
        return Err(SnapTalkError::Decode(format!(
            "format not recognized (detected {detected})"
        )));
    }

    let image = reader
        .decode()
        .map_err(|e| SnapTalkError::Decode(e.to_string()))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(SnapTalkError::Decode(format!(
            "raster has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    tracing::debug!(
        source = %source_hint,
        width = image.width(),
        height = image.height(),
        format = ?format,
        "Decoded image"
    );

    Ok(DecodedImage::new(image, format))
}

/// Turn the camera endpoint's string into raw bytes.
///
/// Accepts bare base64 or a data URL (`data:image/png;base64,...`). Everything up
/// to and including the first comma is dropped; a `data:` media type found
/// there is kept as the payload's declared media type.
pub fn decode_base64_payload(input: &str) -> Result<RawImagePayload> {
    let (media_type, data) = split_data_url(input);

    let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if data.is_empty() {
        return Err(SnapTalkError::Decode(
            "no base64 data found".to_string(),
        ));
    }

    let bytes = BASE64_IMAGE
        .decode(data.as_bytes())
        .map_err(|e| SnapTalkError::Decode(format!("invalid base64: {e}")))?;

    Ok(RawImagePayload::new(bytes).with_media_type(media_type))
}

/// Split an optional data-URL header from its payload.
fn split_data_url(input: &str) -> (Option<&str>, &str) {
    match input.split_once(',') {
        Some((header, data)) => {
            let media_type = header
                .trim()
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .map(str::trim)
                .filter(|media| !media.is_empty());
            (media_type, data)
        }
        None => (None, input),
    }
}

/// Best-effort media type from magic bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

/// Encode a decoded raster as an opaque RGB PNG for the OCR engine.
///
/// Transparent pixels are composited onto white so dark text on a transparent
/// background stays readable after the alpha channel is dropped.
pub fn to_engine_png(image: &DecodedImage) -> Result<Vec<u8>> {
    let rgb = flatten_onto_white(image.image());

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| SnapTalkError::Recognition(format!("failed to encode image: {e}")))?;

    Ok(output)
}

fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let pixel = rgba.get_pixel(x, y);
        let alpha = pixel[3] as u16;
        let blend = |channel: u8| ((channel as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])])
    })
}
