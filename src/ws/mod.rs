pub mod client;
pub mod messages;

pub use client::{SttClient, WsReader, WsWriter};
pub use messages::{ConfigMessage, ServerMessage, TranscriptSegment};
