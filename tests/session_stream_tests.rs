// End-to-end session tests against a mock transcription server.
//
// The mock speaks just enough of the protocol: it expects the JSON
// config handshake first, then binary audio frames, and it pushes
// segment batches back on the same connection.

use anyhow::Result;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use whisperlive_probe::{AudioFile, SessionConfig, TranscriptionSession};

/// In-memory audio: `frames` full 100ms frames at 16kHz.
fn test_audio(frames: usize) -> AudioFile {
    AudioFile {
        path: "test.wav".to_string(),
        duration_seconds: frames as f64 * 0.1,
        sample_rate: 16000,
        channels: 1,
        samples: vec![0.0; frames * 1600],
    }
}

/// Session config tuned so tests finish quickly.
fn fast_config() -> SessionConfig {
    SessionConfig {
        frame_duration: Duration::from_millis(100),
        pacing_factor: 100, // 1ms between sends
        grace_period: Duration::from_millis(200),
        receive_timeout: Duration::from_millis(100),
        ..SessionConfig::for_run(1)
    }
}

/// Accept one connection, verify the handshake, consume `expect_frames`
/// binary frames, then send the given JSON payloads and idle until the
/// client goes away.
async fn spawn_mock_server(
    expect_frames: usize,
    payloads: Vec<String>,
) -> Result<(String, JoinHandle<usize>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("ws://{}", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");

        // First message must be the config handshake
        let first = ws.next().await.expect("no handshake").expect("read failed");
        let raw = first.into_text().expect("handshake not text");
        let config: serde_json::Value = serde_json::from_str(&raw).expect("handshake not JSON");
        assert_eq!(config["uid"], "long-test-1");
        assert_eq!(config["task"], "transcribe");

        let mut frames_seen = 0;
        while frames_seen < expect_frames {
            match ws.next().await {
                Some(Ok(Message::Binary(data))) => {
                    // 1600 f32 samples, little-endian
                    assert_eq!(data.len(), 1600 * 4);
                    frames_seen += 1;
                }
                Some(Ok(_)) => {}
                _ => break,
            }
        }

        for payload in payloads {
            ws.send(Message::Text(payload)).await.expect("send failed");
        }

        // Idle until the client drops the connection
        while let Some(Ok(_)) = ws.next().await {}

        frames_seen
    });

    Ok((url, handle))
}

#[tokio::test]
async fn test_full_session_collects_segments() -> Result<()> {
    let payloads = vec![
        r#"{"segments": [{"start": 0.0, "end": 0.2, "text": "hello"}]}"#.to_string(),
        r#"{"segments": [
            {"start": 0.0, "end": 0.3, "text": "hello"},
            {"start": 0.3, "end": 0.5, "text": "world"}
        ]}"#
        .to_string(),
        r#"{"message": "STATUS: all good"}"#.to_string(),
        r#"{"backend": "faster_whisper"}"#.to_string(),
    ];
    let (url, server) = spawn_mock_server(5, payloads).await?;

    let session = TranscriptionSession::new(fast_config(), url);
    let outcome = session.run(&test_audio(5)).await?;

    assert_eq!(outcome.stats.frames_sent, 5);
    // Raw results keep duplicates; dedup happens at report time
    assert_eq!(outcome.segments.len(), 3);
    assert_eq!(outcome.segments[0].text, "hello");
    assert_eq!(outcome.segments[2].text, "world");
    assert_eq!(outcome.stats.segments_received, 3);
    assert!(outcome.stats.processing_secs > 0.0);

    assert_eq!(server.await?, 5);
    Ok(())
}

#[tokio::test]
async fn test_connection_failure_yields_empty_outcome() -> Result<()> {
    // Grab a port, then close it so the connect is refused
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("ws://{}", listener.local_addr()?);
    drop(listener);

    let session = TranscriptionSession::new(fast_config(), url);
    let outcome = session.run(&test_audio(3)).await?;

    // No error escapes; the session reports an empty result
    assert!(outcome.segments.is_empty());
    assert_eq!(outcome.stats.frames_sent, 0);
    assert_eq!(outcome.stats.segments_received, 0);

    Ok(())
}

#[tokio::test]
async fn test_server_close_mid_stream_degrades_gracefully() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("ws://{}", listener.local_addr()?);

    // Server hangs up right after the handshake
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let mut ws = accept_async(stream).await.expect("handshake failed");
        let _ = ws.next().await;
        let _ = ws.close(None).await;
    });

    let total_frames = 10;
    let session = TranscriptionSession::new(fast_config(), url);
    let outcome = session.run(&test_audio(total_frames)).await?;

    // The feeder stops early (or finishes into the buffer), no segments
    // arrive, and the session still produces an outcome
    assert!(outcome.stats.frames_sent <= total_frames);
    assert!(outcome.segments.is_empty());

    server.await?;
    Ok(())
}
