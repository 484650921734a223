use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::session::SessionStats;
use crate::ws::TranscriptSegment;

/// Deduplicate segments by trimmed text, first occurrence wins.
///
/// Later duplicates are dropped even when their time ranges differ, so
/// a phrase spoken twice with identical wording collapses to one line.
/// Empty texts are dropped entirely.
pub fn dedup_segments(segments: &[TranscriptSegment]) -> Vec<TranscriptSegment> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for seg in segments {
        let text = seg.text.trim();
        if text.is_empty() || !seen.insert(text.to_string()) {
            continue;
        }
        unique.push(TranscriptSegment {
            text: text.to_string(),
            start: seg.start,
            end: seg.end,
        });
    }

    unique
}

/// One transcript line: `[12.3s - 15.6s] text`
pub fn format_line(seg: &TranscriptSegment) -> String {
    format!("[{:.1}s - {:.1}s] {}", seg.start, seg.end, seg.text)
}

/// Render the full report: summary header followed by the transcript.
pub fn render_report(
    run_number: u32,
    audio_path: &str,
    stats: &SessionStats,
    transcript: &[TranscriptSegment],
) -> String {
    let rule = "=".repeat(70);
    let mut out = String::new();

    out.push_str(&format!("Transcription Results - Run #{}\n", run_number));
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("Audio file: {}\n", audio_path));
    out.push_str(&format!(
        "Audio duration: {:.1}s ({:.1} min)\n",
        stats.audio_duration_secs,
        stats.audio_duration_secs / 60.0
    ));
    out.push_str(&format!(
        "Processing time: {:.1}s ({:.1} min)\n",
        stats.processing_secs,
        stats.processing_secs / 60.0
    ));
    out.push_str(&format!(
        "Real-time factor: {:.2}x\n",
        stats.real_time_factor()
    ));
    out.push_str(&format!("Unique segments: {}\n", transcript.len()));
    out.push_str(&format!("{}\n\n", rule));

    let lines: Vec<String> = transcript.iter().map(format_line).collect();
    out.push_str(&lines.join("\n"));

    out
}

/// Write the report under `report_dir`, named with the run number and a
/// timestamp. The directory is created if missing.
pub fn write_report(report_dir: &Path, run_number: u32, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(report_dir)
        .context("Failed to create report directory")?;

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let path = report_dir.join(format!("transcription-run{}-{}.txt", run_number, timestamp));

    fs::write(&path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    info!("Results saved to: {}", path.display());

    Ok(path)
}
