use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tesseract::{OcrEngineMode, PageSegMode, Tesseract};
use tracing::{debug, info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, SnapTalkError};
use crate::models::DecodedImage;

use super::decode::to_engine_png;

/// Converts a raster into text.
///
/// Implementations are shared across request workers, so they must be safe to
/// call concurrently (serializing internally if the engine is not).
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DecodedImage) -> Result<String>;

    fn is_available(&self) -> bool {
        true
    }
}

enum OcrBackend {
    /// `None` only after a failed call consumed the handle; the next call
    /// rebuilds it from the stored config.
    Local { tesseract: Mutex<Option<Tesseract>> },
    Unavailable { reason: String },
}

/// Process-wide Tesseract handle.
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

/// Tesseract `--oem` code to the engine enum. Engine mode is an init-time
/// parameter and cannot be changed on a running handle.
pub(crate) fn engine_mode(code: u32) -> Option<OcrEngineMode> {
    match code {
        0 => Some(OcrEngineMode::TesseractOnly),
        1 => Some(OcrEngineMode::LstmOnly),
        2 => Some(OcrEngineMode::TesseractLstmCombined),
        3 => Some(OcrEngineMode::Default),
        _ => None,
    }
}

/// Tesseract `--psm` code to the segmentation enum.
pub(crate) fn page_seg_mode(code: u32) -> Option<PageSegMode> {
    match code {
        0 => Some(PageSegMode::PsmOsdOnly),
        1 => Some(PageSegMode::PsmAutoOsd),
        2 => Some(PageSegMode::PsmAutoOnly),
        3 => Some(PageSegMode::PsmAuto),
        4 => Some(PageSegMode::PsmSingleColumn),
        5 => Some(PageSegMode::PsmSingleBlockVertText),
        6 => Some(PageSegMode::PsmSingleBlock),
        7 => Some(PageSegMode::PsmSingleLine),
        8 => Some(PageSegMode::PsmSingleWord),
        9 => Some(PageSegMode::PsmCircleWord),
        10 => Some(PageSegMode::PsmSingleChar),
        11 => Some(PageSegMode::PsmSparseText),
        12 => Some(PageSegMode::PsmSparseTextOsd),
        13 => Some(PageSegMode::PsmRawLine),
        _ => None,
    }
}

fn resolve_tessdata_dir(dir: &Path) -> Option<&str> {
    if !dir.is_dir() {
        warn!(
            path = %dir.display(),
            "Could not use custom tessdata path, falling back to engine default"
        );
        return None;
    }

    match dir.to_str() {
        Some(path) => Some(path),
        None => {
            warn!(
                path = %dir.display(),
                "Tessdata path is not valid UTF-8, falling back to engine default"
            );
            None
        }
    }
}

/// Build a handle with every configured mode in effect. An unknown mode code is
/// an error rather than a silent fallback to the engine default.
fn create_tesseract(config: &OcrConfig) -> std::result::Result<Tesseract, String> {
    let oem = engine_mode(config.engine_mode)
        .ok_or_else(|| format!("unsupported OCR engine mode {}", config.engine_mode))?;
    let psm = page_seg_mode(config.page_seg_mode)
        .ok_or_else(|| format!("unsupported page segmentation mode {}", config.page_seg_mode))?;

    let data_path = resolve_tessdata_dir(&config.tessdata_dir);
    let mut tesseract = Tesseract::new_with_oem(data_path, Some(config.language.as_str()), oem)
        .map_err(|e| e.to_string())?;
    tesseract.set_page_seg_mode(psm);

    Ok(tesseract)
}

impl OcrProvider {
    /// Never fails: an engine that cannot start is kept as `Unavailable` and
    /// reports the reason on every recognition attempt.
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match create_tesseract(config) {
            Ok(tesseract) => {
                info!(
                    language = %config.language,
                    psm = config.page_seg_mode,
                    oem = config.engine_mode,
                    tessdata = %config.tessdata_dir.display(),
                    "Tesseract OCR initialized"
                );
                OcrBackend::Local {
                    tesseract: Mutex::new(Some(tesseract)),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }
}

impl TextRecognizer for OcrProvider {
    fn recognize(&self, image: &DecodedImage) -> Result<String> {
        let tesseract = match &self.backend {
            OcrBackend::Local { tesseract } => tesseract,
            OcrBackend::Unavailable { reason } => {
                return Err(SnapTalkError::Recognition(reason.clone()));
            }
        };

        let png = to_engine_png(image)?;

        let mut slot = tesseract
            .lock()
            .map_err(|_| SnapTalkError::Recognition("OCR engine lock poisoned".to_string()))?;

        let engine = match slot.take() {
            Some(engine) => engine,
            None => {
                warn!("Rebuilding Tesseract handle after a failed recognition");
                create_tesseract(&self.config).map_err(SnapTalkError::Recognition)?
            }
        };

        let started = Instant::now();
        let mut engine = engine
            .set_image_from_mem(&png)
            .map_err(|e| SnapTalkError::Recognition(format!("Failed to set image: {e}")))?;
        let text = engine.get_text();
        *slot = Some(engine);

        let text =
            text.map_err(|e| SnapTalkError::Recognition(format!("Failed to extract text: {e}")))?;

        debug!(
            width = image.width(),
            height = image.height(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tesseract recognition finished"
        );

        Ok(text)
    }

    fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::decode_image;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::path::PathBuf;

    fn blank_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([255, 255, 255]),
        ));
        let mut output = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
            .unwrap();
        output
    }

    fn make_config(tessdata_dir: PathBuf) -> OcrConfig {
        OcrConfig {
            tessdata_dir,
            ..OcrConfig::default()
        }
    }

    #[test]
    fn test_missing_tessdata_dir_is_not_fatal() {
        let config = make_config(PathBuf::from("/definitely/not/a/tessdata/dir"));
        let provider = OcrProvider::new(&config);
        assert_eq!(provider.config().tessdata_dir, config.tessdata_dir);
    }

    #[test]
    fn test_resolve_tessdata_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_tessdata_dir(dir.path()), dir.path().to_str());
        assert_eq!(resolve_tessdata_dir(Path::new("/no/such/tessdata")), None);
    }

    #[test]
    fn test_unavailable_backend_fails_at_call_time() {
        let provider = OcrProvider {
            backend: OcrBackend::Unavailable {
                reason: "Test unavailable".to_string(),
            },
            config: OcrConfig::default(),
        };
        let image = decode_image(&blank_png(20, 20), "blank.png").unwrap();

        assert!(!provider.is_available());
        match provider.recognize(&image) {
            Err(SnapTalkError::Recognition(msg)) => assert_eq!(msg, "Test unavailable"),
            other => panic!("expected recognition error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_image_yields_no_text() {
        let provider = OcrProvider::new(&OcrConfig::default());
        if !provider.is_available() {
            eprintln!("skipping: tesseract not installed");
            return;
        }

        let image = decode_image(&blank_png(200, 80), "blank.png").unwrap();
        let text = provider.recognize(&image).expect("blank image should be recognized");
        assert!(text.trim().is_empty(), "unexpected text: {text:?}");
    }

    #[test]
    fn test_fixed_modes_map_to_engine_settings() {
        assert!(matches!(
            engine_mode(crate::config::OCR_ENGINE_MODE),
            Some(OcrEngineMode::LstmOnly)
        ));
        assert!(matches!(
            page_seg_mode(crate::config::OCR_PAGE_SEG_MODE),
            Some(PageSegMode::PsmAutoOsd)
        ));
        assert!(engine_mode(4).is_none());
        assert!(page_seg_mode(14).is_none());
    }

    #[test]
    fn test_unknown_engine_mode_is_not_silently_defaulted() {
        let config = OcrConfig {
            engine_mode: 42,
            ..OcrConfig::default()
        };
        let provider = OcrProvider::new(&config);
        assert!(!provider.is_available());

        let image = decode_image(&blank_png(20, 20), "blank.png").unwrap();
        match provider.recognize(&image) {
            Err(SnapTalkError::Recognition(msg)) => {
                assert!(msg.contains("unsupported OCR engine mode 42"), "{msg}")
            }
            other => panic!("expected recognition error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_page_seg_mode_is_not_silently_defaulted() {
        let config = OcrConfig {
            page_seg_mode: 99,
            ..OcrConfig::default()
        };
        let provider = OcrProvider::new(&config);
        assert!(!provider.is_available());
    }

    #[test]
    fn test_handle_survives_repeated_calls() {
        let provider = OcrProvider::new(&OcrConfig::default());
        if !provider.is_available() {
            eprintln!("skipping: tesseract not installed");
            return;
        }

        let image = decode_image(&blank_png(120, 60), "blank.png").unwrap();
        for _ in 0..3 {
            provider.recognize(&image).expect("recognition should succeed");
        }
        match &provider.backend {
            OcrBackend::Local { tesseract } => assert!(tesseract.lock().unwrap().is_some()),
            OcrBackend::Unavailable { .. } => unreachable!(),
        }
    }
}
