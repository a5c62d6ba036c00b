pub mod extract;
pub mod health;

pub use extract::{extract_text, extract_text_camera};
pub use health::health_check;
