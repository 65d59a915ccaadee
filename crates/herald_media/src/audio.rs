//! Background music mixing.

use crate::video::FfmpegTools;
use herald_error::{MediaError, MediaErrorKind};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Volume applied to background music under the video's own audio.
pub const BACKGROUND_VOLUME: f32 = 0.3;

/// ffmpeg arguments that lay looped `audio` under `video`, trimmed to
/// `duration_secs`.
pub fn mix_args(
    video: &Path,
    audio: &Path,
    output: &Path,
    duration_secs: f64,
    video_has_audio: bool,
) -> Vec<String> {
    let filter = if video_has_audio {
        format!(
            "[1:a]volume={v}[bg];[0:a][bg]amix=inputs=2:duration=first:dropout_transition=0[aout]",
            v = BACKGROUND_VOLUME
        )
    } else {
        format!("[1:a]volume={}[aout]", BACKGROUND_VOLUME)
    };

    vec![
        "-v".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        video.to_string_lossy().to_string(),
        "-stream_loop".to_string(),
        "-1".to_string(),
        "-i".to_string(),
        audio.to_string_lossy().to_string(),
        "-filter_complex".to_string(),
        filter,
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "[aout]".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-t".to_string(),
        format!("{:.3}", duration_secs),
        output.to_string_lossy().to_string(),
    ]
}

fn copy_unchanged(video: &Path, output: &Path) -> Result<(), MediaError> {
    std::fs::copy(video, output)
        .map(|_| ())
        .map_err(|e| MediaError::new(MediaErrorKind::Io(e.to_string())))
}

/// Mix background music into `video`, writing `output`.
///
/// A missing audio file or a failed mix leaves the video unchanged (copied
/// to `output`) and returns `Ok(false)`. Blocking.
#[tracing::instrument(skip(tools))]
pub fn mix_background_audio(
    tools: &FfmpegTools,
    video: &Path,
    audio: &Path,
    output: &Path,
    duration_secs: f64,
    video_has_audio: bool,
) -> Result<bool, MediaError> {
    if !audio.exists() {
        warn!(audio = %audio.display(), "Background music not found, continuing without it");
        copy_unchanged(video, output)?;
        return Ok(false);
    }

    let status = Command::new(tools.ffmpeg())
        .args(mix_args(video, audio, output, duration_secs, video_has_audio))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) if status.success() => {
            info!("Background music added");
            Ok(true)
        }
        Ok(status) => {
            warn!(%status, "Background music mix failed, continuing without it");
            copy_unchanged(video, output)?;
            Ok(false)
        }
        Err(e) => {
            warn!(error = %e, "Could not run ffmpeg for audio mix, continuing without it");
            copy_unchanged(video, output)?;
            Ok(false)
        }
    }
}
