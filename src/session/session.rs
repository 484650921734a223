use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::audio::AudioFile;
use crate::ws::{ServerMessage, SttClient, TranscriptSegment, WsReader, WsWriter};
use anyhow::Result;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};

/// Whether a progress line should be emitted after `sent` of `total`
/// frames. Roughly ten lines per run; the `+ 1` keeps the cadence sane
/// for totals below ten.
pub fn should_log_progress(sent: usize, total: usize) -> bool {
    sent % (total / 10 + 1) == 0
}

/// Everything a run produces: raw segments in receipt order plus stats.
pub struct SessionOutcome {
    pub segments: Vec<TranscriptSegment>,
    pub stats: SessionStats,
}

/// A single-shot diagnostic session against the transcription service.
///
/// `run` connects, sends the handshake, then drives two concurrent
/// tasks over the split websocket: the feeder streams paced audio
/// frames and the collector accumulates returned segments. Transport
/// failures degrade to a partial or empty result; only audio loading
/// errors are fatal to the caller.
pub struct TranscriptionSession {
    config: SessionConfig,
    endpoint_url: String,
}

impl TranscriptionSession {
    pub fn new(config: SessionConfig, endpoint_url: String) -> Self {
        Self { config, endpoint_url }
    }

    pub async fn run(&self, audio: &AudioFile) -> Result<SessionOutcome> {
        let started_at = Utc::now();
        let start = Instant::now();

        let results: Arc<Mutex<Vec<TranscriptSegment>>> = Arc::new(Mutex::new(Vec::new()));
        let mut frames_sent = 0;

        // Transport errors are downgraded: log, then report whatever
        // was collected before the failure.
        match self.stream(audio, Arc::clone(&results), start).await {
            Ok(sent) => frames_sent = sent,
            Err(e) => error!("Connection error: {:#}", e),
        }

        // Both tasks have been awaited by now, so this lock is
        // uncontended and the collector can no longer append.
        let segments = {
            let guard = results.lock().await;
            guard.clone()
        };

        let stats = SessionStats {
            started_at,
            audio_duration_secs: audio.duration_seconds,
            processing_secs: start.elapsed().as_secs_f64(),
            frames_sent,
            segments_received: segments.len(),
        };

        Ok(SessionOutcome { segments, stats })
    }

    /// Connect, handshake, and run feeder + collector to completion.
    /// Returns the number of frames sent.
    async fn stream(
        &self,
        audio: &AudioFile,
        results: Arc<Mutex<Vec<TranscriptSegment>>>,
        start: Instant,
    ) -> Result<usize> {
        let mut client = SttClient::connect(&self.endpoint_url).await?;
        client.send_config(&self.config.handshake()).await?;
        let (writer, reader) = client.into_split();

        let stop = Arc::new(AtomicBool::new(false));

        let collector = tokio::spawn(collect_results(
            reader,
            results,
            Arc::clone(&stop),
            self.config.receive_timeout,
        ));

        let sent = self.feed_frames(audio, writer, start).await;

        // Let trailing results arrive before signalling the collector.
        sleep(self.config.grace_period).await;
        stop.store(true, Ordering::SeqCst);

        if let Err(e) = collector.await {
            error!("Collector task panicked: {}", e);
        }

        Ok(sent)
    }

    /// Stream consecutive frames at the configured pace. A failed send
    /// means the connection closed; stop early and report how far we got.
    async fn feed_frames(&self, audio: &AudioFile, mut writer: WsWriter, start: Instant) -> usize {
        let frame_samples = self.config.frame_samples();
        let total = audio.frame_count(frame_samples);
        let mut sent = 0;

        for frame in audio.frames(frame_samples) {
            let payload: Vec<u8> = frame.iter().flat_map(|s| s.to_le_bytes()).collect();

            if let Err(e) = writer.send(Message::Binary(payload)).await {
                warn!("Connection closed after {} of {} frames: {}", sent, total, e);
                break;
            }
            sent += 1;

            if should_log_progress(sent, total) {
                info!(
                    "[{:.0}s] Sent {}%...",
                    start.elapsed().as_secs_f64(),
                    sent * 100 / total
                );
            }

            sleep(self.config.send_interval()).await;
        }

        info!("Finished sending audio ({} frames)", sent);
        sent
    }
}

/// Receive loop: append segment batches to the shared results log and
/// surface server error messages. Exits on the stop signal, stream end,
/// or a receive error; all are normal session end.
async fn collect_results(
    mut reader: WsReader,
    results: Arc<Mutex<Vec<TranscriptSegment>>>,
    stop: Arc<AtomicBool>,
    receive_timeout: Duration,
) {
    let mut distinct_count = 0usize;
    let mut last_text = String::new();

    loop {
        match timeout(receive_timeout, reader.next()).await {
            Ok(Some(Ok(Message::Text(raw)))) => {
                match serde_json::from_str::<ServerMessage>(&raw) {
                    Ok(ServerMessage::SegmentBatch { segments }) => {
                        let mut log = results.lock().await;
                        for seg in segments {
                            let text = seg.text.trim().to_string();
                            log.push(seg);

                            if !text.is_empty() && text != last_text {
                                distinct_count += 1;
                                // Every 5th distinct text, to keep output compact
                                if distinct_count % 5 == 1 {
                                    info!("#{}: {}", distinct_count, preview(&text, 60));
                                }
                                last_text = text;
                            }
                        }
                    }
                    Ok(ServerMessage::Status { message }) => {
                        if message.to_lowercase().contains("error") {
                            warn!("Server error: {}", message);
                        }
                    }
                    Ok(ServerMessage::Other(_)) => {}
                    // Malformed payload: skip this message, keep going
                    Err(_) => {}
                }
            }
            Ok(Some(Ok(Message::Close(_)))) => {
                info!("Server closed the connection");
                break;
            }
            Ok(Some(Ok(_))) => {} // binary / ping / pong
            Ok(Some(Err(e))) => {
                error!("Receive error: {}", e);
                break;
            }
            Ok(None) => {
                info!("Transcript stream ended");
                break;
            }
            Err(_) => {
                // Timeout: re-check the stop signal and keep waiting
                if stop.load(Ordering::SeqCst) {
                    break;
                }
            }
        }
    }

    info!("Collector stopped ({} distinct texts seen)", distinct_count);
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
