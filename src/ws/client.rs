use anyhow::{Context, Result};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async_with_config, MaybeTlsStream, WebSocketStream};
use tracing::info;

use super::messages::ConfigMessage;

pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Inbound limit; full transcript payloads grow with audio length
const MAX_MESSAGE_BYTES: usize = 1 << 24;

/// Client connection to the streaming transcription service.
///
/// The underlying websocket is split so the audio feeder can send while
/// the result collector receives on the same connection.
pub struct SttClient {
    writer: WsWriter,
    reader: WsReader,
}

impl SttClient {
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to {}", url);

        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = Some(MAX_MESSAGE_BYTES);
        ws_config.max_frame_size = Some(MAX_MESSAGE_BYTES);

        let (stream, _response) = connect_async_with_config(url, Some(ws_config), false)
            .await
            .context("Failed to connect to transcription service")?;

        info!("Connected to transcription service");

        let (writer, reader) = stream.split();
        Ok(Self { writer, reader })
    }

    /// Send the configuration handshake. Must happen before any frame.
    pub async fn send_config(&mut self, config: &ConfigMessage) -> Result<()> {
        let payload = serde_json::to_string(config)?;

        self.writer
            .send(Message::Text(payload.clone()))
            .await
            .context("Failed to send config handshake")?;

        info!("Sent config: {}", payload);

        Ok(())
    }

    /// Split into independent send and receive halves.
    pub fn into_split(self) -> (WsWriter, WsReader) {
        (self.writer, self.reader)
    }
}
