use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ws::ConfigMessage;

/// Configuration for a transcription session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g. "long-test-3")
    pub session_id: String,

    /// Language hint sent in the handshake
    pub language: String,

    /// Task mode sent in the handshake
    pub task: String,

    /// Whisper model name sent in the handshake
    pub model: String,

    /// Whether the server should run voice activity detection
    pub use_vad: bool,

    /// Sample rate of the streamed audio (Whisper expects 16kHz)
    pub sample_rate: u32,

    /// Duration of one audio frame
    pub frame_duration: Duration,

    /// Speed multiplier for pacing: 2 streams at 2x real time,
    /// keeping test runs short
    pub pacing_factor: u32,

    /// Wait after the last frame so trailing results can arrive
    pub grace_period: Duration,

    /// Bounded wait on each receive, so the collector can observe the
    /// stop signal promptly; not a protocol timeout
    pub receive_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            language: "en".to_string(),
            task: "transcribe".to_string(),
            model: "small.en".to_string(),
            use_vad: true,
            sample_rate: 16000,                        // Whisper expects 16kHz
            frame_duration: Duration::from_millis(100), // 100ms frames
            pacing_factor: 2,
            grace_period: Duration::from_secs(10),
            receive_timeout: Duration::from_secs(2),
        }
    }
}

impl SessionConfig {
    /// Config for a numbered diagnostic run.
    pub fn for_run(run_number: u32) -> Self {
        Self {
            session_id: format!("long-test-{}", run_number),
            ..Self::default()
        }
    }

    /// Samples per frame (100ms at 16kHz = 1600).
    pub fn frame_samples(&self) -> usize {
        (self.sample_rate as u64 * self.frame_duration.as_millis() as u64 / 1000) as usize
    }

    /// Sleep between sends: frame duration divided by the pacing factor.
    pub fn send_interval(&self) -> Duration {
        self.frame_duration / self.pacing_factor
    }

    /// The handshake record sent at session start.
    pub fn handshake(&self) -> ConfigMessage {
        ConfigMessage {
            uid: self.session_id.clone(),
            language: self.language.clone(),
            task: self.task.clone(),
            model: self.model.clone(),
            use_vad: self.use_vad,
        }
    }
}
