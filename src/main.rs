use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;
use whisperlive_probe::{report, AudioFile, Config, SessionConfig, TranscriptionSession};

/// Stream a WAV file to a WhisperLive endpoint and save the transcript.
#[derive(Parser)]
struct Cli {
    /// Path to the input WAV file (16kHz mono PCM)
    #[arg(default_value = "audio.wav")]
    audio_file: String,

    /// Run number, used in the session id and report filename
    #[arg(default_value_t = 1)]
    run_number: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load()?;

    info!("Long Transcription Test - Run #{}", cli.run_number);
    info!("Started: {}", chrono::Utc::now().to_rfc3339());

    // Audio errors are fatal; nothing has touched the network yet.
    let audio = AudioFile::open(&cli.audio_file)?;

    let session = TranscriptionSession::new(
        SessionConfig::for_run(cli.run_number),
        cfg.endpoint_url(),
    );
    let outcome = session.run(&audio).await?;

    let transcript = report::dedup_segments(&outcome.segments);
    let contents = report::render_report(cli.run_number, &audio.path, &outcome.stats, &transcript);
    let path = report::write_report(Path::new(&cfg.report_dir), cli.run_number, &contents)?;

    let stats = &outcome.stats;
    info!("Results Summary");
    info!(
        "  Audio duration:   {:.1}s ({:.1} min)",
        stats.audio_duration_secs,
        stats.audio_duration_secs / 60.0
    );
    info!(
        "  Processing time:  {:.1}s ({:.1} min)",
        stats.processing_secs,
        stats.processing_secs / 60.0
    );
    info!("  Real-time factor: {:.2}x", stats.real_time_factor());
    info!("  Frames sent:      {}", stats.frames_sent);
    info!("  Unique segments:  {}", transcript.len());
    info!("  Results saved to: {}", path.display());

    Ok(())
}
