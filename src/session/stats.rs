use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a completed transcription session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Duration of the source audio in seconds
    pub audio_duration_secs: f64,

    /// Wall-clock time from connect attempt to both tasks finishing
    pub processing_secs: f64,

    /// Number of audio frames actually sent
    pub frames_sent: usize,

    /// Number of transcript segments received (before deduplication)
    pub segments_received: usize,
}

impl SessionStats {
    /// Processing time divided by audio duration; below 1.0 means the
    /// run finished faster than real time.
    pub fn real_time_factor(&self) -> f64 {
        if self.audio_duration_secs > 0.0 {
            self.processing_secs / self.audio_duration_secs
        } else {
            0.0
        }
    }
}
