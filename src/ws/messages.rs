use serde::{Deserialize, Serialize};

/// One-shot configuration handshake, sent before any audio frame
#[derive(Debug, Clone, Serialize)]
pub struct ConfigMessage {
    /// Session identifier echoed back by the server
    pub uid: String,
    /// Language hint (e.g. "en")
    pub language: String,
    /// Task mode (e.g. "transcribe")
    pub task: String,
    /// Whisper model name (e.g. "small.en")
    pub model: String,
    /// Whether the server should run voice activity detection
    pub use_vad: bool,
}

/// A transcribed span of speech returned by the service
///
/// The server may restate a time range in a later revision, so segments
/// are neither monotonic nor non-overlapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
}

/// Inbound message shapes
///
/// Anything that is neither a segment batch nor a status message falls
/// through to `Other` and is ignored by the collector.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    SegmentBatch { segments: Vec<TranscriptSegment> },
    Status { message: String },
    Other(serde_json::Value),
}
