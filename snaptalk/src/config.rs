use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Tesseract language pack used for every request.
pub const OCR_LANGUAGE: &str = "eng";

/// Fully automatic page segmentation with orientation and script detection.
pub const OCR_PAGE_SEG_MODE: u32 = 1;

/// Neural-net (LSTM) recognizer only.
pub const OCR_ENGINE_MODE: u32 = 1;

pub const DEFAULT_SERVICE_NAME: &str = "SnapTalk OCR Service";

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const WINDOWS_TESSDATA_DIR: &str = "C:\\Program Files\\Tesseract-OCR\\tessdata";
const MACOS_TESSDATA_DIR: &str = "/usr/local/share/tessdata";
const LINUX_TESSDATA_DIR: &str = "/usr/share/tesseract-ocr/4.00/tessdata";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Default tessdata location for an OS family as reported by
/// [`std::env::consts::OS`].
pub fn default_tessdata_dir_for(os: &str) -> PathBuf {
    match os {
        "windows" => PathBuf::from(WINDOWS_TESSDATA_DIR),
        "macos" | "ios" => PathBuf::from(MACOS_TESSDATA_DIR),
        _ => PathBuf::from(LINUX_TESSDATA_DIR),
    }
}

pub fn default_tessdata_dir() -> PathBuf {
    default_tessdata_dir_for(env::consts::OS)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies, which also caps base64 camera payloads.
    pub max_upload_bytes: usize,
    pub service_name: String,
}

/// Recognition settings fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub language: String,
    pub page_seg_mode: u32,
    pub engine_mode: u32,
    pub tessdata_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: OCR_LANGUAGE.to_string(),
            page_seg_mode: OCR_PAGE_SEG_MODE,
            engine_mode: OCR_ENGINE_MODE,
            tessdata_dir: default_tessdata_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SNAPTALK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SNAPTALK_PORT", 8080),
                max_upload_bytes: parse_env_or(
                    "SNAPTALK_MAX_UPLOAD_BYTES",
                    DEFAULT_MAX_UPLOAD_BYTES,
                ),
                service_name: DEFAULT_SERVICE_NAME.to_string(),
            },
            ocr: OcrConfig {
                tessdata_dir: env::var("OCR_TESSDATA_DIR")
                    .ok()
                    .filter(|dir| !dir.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(default_tessdata_dir),
                ..OcrConfig::default()
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
