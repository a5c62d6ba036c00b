use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::ocr::TextRecognizer;
use crate::processing::RecognitionPipeline;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: RecognitionPipeline,
    pub clock: Arc<MonotonicClock>,
}

impl AppState {
    /// `recognizer` is the single engine handle shared by every request.
    pub fn new(config: Config, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: RecognitionPipeline::new(recognizer),
            clock: Arc::new(MonotonicClock::default()),
        }
    }
}

/// Wall-clock milliseconds clamped so readings never go backwards, even if the
/// system clock is stepped.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_millis: AtomicI64,
}

impl MonotonicClock {
    pub fn now_millis(&self) -> i64 {
        self.observe(Utc::now().timestamp_millis())
    }

    fn observe(&self, wall_millis: i64) -> i64 {
        let previous = self.last_millis.fetch_max(wall_millis, Ordering::SeqCst);
        previous.max(wall_millis)
    }
}
