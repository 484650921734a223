pub mod audio;
pub mod config;
pub mod report;
pub mod session;
pub mod ws;

pub use audio::AudioFile;
pub use config::Config;
pub use session::{SessionConfig, SessionOutcome, SessionStats, TranscriptionSession};
pub use ws::{ConfigMessage, ServerMessage, SttClient, TranscriptSegment};
