//! Video post-processing: fade the generated clip to black and append a
//! branded logo scene.
//!
//! Frames are decoded by `ffmpeg` into raw `rgb24`, transformed in memory
//! and piped into a second `ffmpeg` process for encoding. The decoder runs
//! `fps` frames ahead of the encoder so the final second can be faded
//! without knowing the frame count in advance.

use derive_getters::Getters;
use herald_error::{MediaError, MediaErrorKind};
use image::{Rgba, RgbImage, RgbaImage};
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tracing::{debug, info, warn};

/// Length of the appended logo scene, in seconds.
pub const LOGO_SCENE_SECONDS: u32 = 2;

/// Largest share of each frame dimension the logo may cover.
pub const LOGO_MAX_RATIO: f32 = 0.4;

/// Locations of the external ffmpeg tools.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FfmpegTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegTools {
    /// Tools at explicit paths.
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

/// Stream properties needed for frame processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct VideoInfo {
    width: u32,
    height: u32,
    fps: u32,
    has_audio: bool,
}

impl VideoInfo {
    /// Describe a video stream.
    pub fn new(width: u32, height: u32, fps: u32, has_audio: bool) -> Self {
        Self {
            width,
            height,
            fps: fps.max(1),
            has_audio,
        }
    }

    /// Bytes in one `rgb24` frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Outcome of [`postprocess_video`].
#[derive(Debug, Clone, Copy, PartialEq, Getters)]
pub struct PostprocessReport {
    info: VideoInfo,
    frames_written: u64,
}

impl PostprocessReport {
    /// Duration of the encoded output.
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / f64::from(self.info.fps)
    }
}

/// Parse an ffprobe rate such as `30/1` or `30000/1001`.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = match rate.split_once('/') {
        Some((num, den)) => (num.trim().parse::<f64>().ok()?, den.trim().parse::<f64>().ok()?),
        None => (rate.trim().parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}

#[derive(serde::Deserialize)]
struct StreamListing {
    #[serde(default)]
    streams: Vec<StreamEntry>,
}

#[derive(serde::Deserialize)]
struct StreamEntry {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Interpret `ffprobe -of json -show_entries stream=...` output.
pub fn parse_video_info(json: &str) -> Result<VideoInfo, MediaError> {
    let listing: StreamListing = serde_json::from_str(json)
        .map_err(|e| MediaError::new(MediaErrorKind::VideoInfo(e.to_string())))?;

    let video = listing
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| MediaError::new(MediaErrorKind::VideoInfo("no video stream".to_string())))?;

    let (width, height) = match (video.width, video.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(MediaError::new(MediaErrorKind::VideoInfo(
                "video stream has no dimensions".to_string(),
            )));
        }
    };

    let fps = video
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video.avg_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| MediaError::new(MediaErrorKind::VideoInfo("unknown frame rate".to_string())))?;

    let has_audio = listing
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoInfo::new(width, height, fps.round() as u32, has_audio))
}

/// Run ffprobe on `input`.
#[tracing::instrument(skip(tools))]
pub fn read_video_info(tools: &FfmpegTools, input: &Path) -> Result<VideoInfo, MediaError> {
    let output = Command::new(&tools.ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "stream=codec_type,width,height,r_frame_rate,avg_frame_rate",
            "-of",
            "json",
        ])
        .arg(input)
        .output()
        .map_err(|e| process_error("ffprobe", e.to_string()))?;

    if !output.status.success() {
        return Err(process_error(
            "ffprobe",
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }
    parse_video_info(&String::from_utf8_lossy(&output.stdout))
}

/// Scale every channel of an `rgb24` frame by `alpha` (towards black).
pub fn fade_frame(frame: &mut [u8], alpha: f32) {
    if alpha >= 1.0 {
        return;
    }
    let alpha = alpha.max(0.0);
    for value in frame.iter_mut() {
        *value = (f32::from(*value) * alpha) as u8;
    }
}

/// Brightness of frame `index` among the final `window` frames of a clip.
///
/// The last frame is fully black.
pub fn fade_out_alpha(index: usize, window: usize) -> f32 {
    if window == 0 {
        return 1.0;
    }
    1.0 - (index + 1) as f32 / window as f32
}

/// Brightness of frame `index` of the logo scene: fade in over the first
/// half second, fade out over the last.
pub fn logo_scene_alpha(index: u32, fps: u32) -> f32 {
    let total = fps * LOGO_SCENE_SECONDS;
    let half = fps / 2;
    if half == 0 {
        return 1.0;
    }
    if index < half {
        index as f32 / half as f32
    } else if index > total - half {
        (total - index) as f32 / half as f32
    } else {
        1.0
    }
}

/// Logo centred on a white card the size of the video.
///
/// Logos larger than 40 % of either dimension are scaled down; smaller logos
/// keep their size.
pub fn logo_card(width: u32, height: u32, logo: &RgbaImage) -> RgbImage {
    let mut card = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let max_w = ((width as f32 * LOGO_MAX_RATIO) as u32).max(1);
    let max_h = ((height as f32 * LOGO_MAX_RATIO) as u32).max(1);

    let logo = if logo.width() > max_w || logo.height() > max_h {
        herald_frame::fit_inside(logo, max_w, max_h)
    } else {
        logo.clone()
    };

    let x = (i64::from(width) - i64::from(logo.width())) / 2;
    let y = (i64::from(height) - i64::from(logo.height())) / 2;
    image::imageops::overlay(&mut card, &logo, x, y);
    image::DynamicImage::ImageRgba8(card).to_rgb8()
}

/// Destination for processed `rgb24` frames.
pub trait FrameSink {
    /// Accept one frame.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), MediaError>;
}

impl FrameSink for Vec<Vec<u8>> {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), MediaError> {
        self.push(frame.to_vec());
        Ok(())
    }
}

/// Apply the branding transform to a frame stream.
///
/// Frames pass through unchanged except for the final `fps` frames, which
/// fade to black. When `card` is given, `2 * fps` logo frames follow.
/// Returns the number of frames written.
pub fn brand_frames<I, S>(
    frames: I,
    info: &VideoInfo,
    card: Option<&RgbImage>,
    sink: &mut S,
) -> Result<u64, MediaError>
where
    I: IntoIterator<Item = Result<Vec<u8>, MediaError>>,
    S: FrameSink,
{
    let window = info.fps as usize;
    let mut pending: VecDeque<Vec<u8>> = VecDeque::with_capacity(window + 1);
    let mut written = 0u64;

    for frame in frames {
        pending.push_back(frame?);
        if pending.len() > window {
            if let Some(ready) = pending.pop_front() {
                sink.write_frame(&ready)?;
                written += 1;
            }
        }
    }

    let tail = pending.len();
    for (index, mut frame) in pending.into_iter().enumerate() {
        fade_frame(&mut frame, fade_out_alpha(index, tail));
        sink.write_frame(&frame)?;
        written += 1;
    }

    if let Some(card) = card {
        for index in 0..info.fps * LOGO_SCENE_SECONDS {
            let mut frame = card.as_raw().clone();
            fade_frame(&mut frame, logo_scene_alpha(index, info.fps));
            sink.write_frame(&frame)?;
            written += 1;
        }
    }

    Ok(written)
}

/// Reads fixed-size raw frames from a decoder.
struct RawFrames<R> {
    reader: R,
    frame_len: usize,
}

impl<R: Read> Iterator for RawFrames<R> {
    type Item = Result<Vec<u8>, MediaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut frame = vec![0u8; self.frame_len];
        match self.reader.read_exact(&mut frame) {
            Ok(()) => Some(Ok(frame)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => None,
            Err(e) => Some(Err(MediaError::new(MediaErrorKind::Io(e.to_string())))),
        }
    }
}

struct EncoderSink {
    stdin: ChildStdin,
}

impl FrameSink for EncoderSink {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), MediaError> {
        self.stdin
            .write_all(frame)
            .map_err(|e| process_error("ffmpeg encoder", e.to_string()))
    }
}

fn process_error(tool: &str, reason: String) -> MediaError {
    MediaError::new(MediaErrorKind::Process {
        tool: tool.to_string(),
        reason,
    })
}

/// Arguments that decode `input` to raw `rgb24` on stdout.
pub fn decoder_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "pipe:1".to_string(),
    ]
}

/// Arguments that encode raw `rgb24` frames from stdin to an H.264 MP4.
pub fn encoder_args(info: &VideoInfo, output: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-s".to_string(),
        format!("{}x{}", info.width, info.height),
        "-r".to_string(),
        info.fps.to_string(),
        "-i".to_string(),
        "pipe:0".to_string(),
        "-an".to_string(),
        "-vf".to_string(),
        "pad=ceil(iw/2)*2:ceil(ih/2)*2".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-preset".to_string(),
        "fast".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

fn finish(tool: &str, mut child: Child) -> Result<(), MediaError> {
    let status = child
        .wait()
        .map_err(|e| process_error(tool, e.to_string()))?;
    if !status.success() {
        return Err(process_error(tool, format!("exited with {}", status)));
    }
    Ok(())
}

/// Fade `input` to black, append the logo scene and write `output`.
///
/// Blocking; run it on `spawn_blocking`. The logo scene is skipped when no
/// logo is given.
#[tracing::instrument(skip(tools, logo))]
pub fn postprocess_video(
    tools: &FfmpegTools,
    input: &Path,
    output: &Path,
    logo: Option<&RgbaImage>,
) -> Result<PostprocessReport, MediaError> {
    let info = read_video_info(tools, input)?;
    info!(
        width = info.width,
        height = info.height,
        fps = info.fps,
        "Post-processing video"
    );
    let card = logo.map(|logo| logo_card(info.width, info.height, logo));
    if card.is_none() {
        warn!("Logo not available, skipping logo scene");
    }

    let mut decoder = Command::new(&tools.ffmpeg)
        .args(decoder_args(input))
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| process_error("ffmpeg decoder", e.to_string()))?;

    let mut encoder = match Command::new(&tools.ffmpeg)
        .args(encoder_args(&info, output))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(encoder) => encoder,
        Err(e) => {
            let _ = decoder.kill();
            let _ = decoder.wait();
            return Err(process_error("ffmpeg encoder", e.to_string()));
        }
    };

    let streams: Result<(ChildStdout, ChildStdin), MediaError> =
        match (decoder.stdout.take(), encoder.stdin.take()) {
            (Some(stdout), Some(stdin)) => Ok((stdout, stdin)),
            _ => Err(process_error("ffmpeg", "failed to capture pipes".to_string())),
        };

    let result = streams.and_then(|(stdout, stdin)| {
        let frames = RawFrames {
            reader: stdout,
            frame_len: info.frame_len(),
        };
        // Dropping the sink closes the encoder's stdin.
        let mut sink = EncoderSink { stdin };
        brand_frames(frames, &info, card.as_ref(), &mut sink)
    });

    match result {
        Ok(frames_written) => {
            finish("ffmpeg decoder", decoder)?;
            finish("ffmpeg encoder", encoder)?;
            debug!(frames_written, "Video encoded");
            Ok(PostprocessReport {
                info,
                frames_written,
            })
        }
        Err(e) => {
            let _ = decoder.kill();
            let _ = encoder.kill();
            let _ = decoder.wait();
            let _ = encoder.wait();
            Err(e)
        }
    }
}
