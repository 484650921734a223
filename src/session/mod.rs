//! Transcription session management
//!
//! This module provides the `TranscriptionSession` abstraction that manages:
//! - The websocket connection and configuration handshake
//! - Paced streaming of audio frames (the feeder)
//! - Concurrent collection of transcript segments (the collector)
//! - Session statistics

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::{should_log_progress, SessionOutcome, TranscriptionSession};
pub use stats::SessionStats;
