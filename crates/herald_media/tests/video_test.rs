//! Tests for video frame transforms and ffmpeg argument construction.

use herald_core::{ContentType, Platform};
use herald_media::{
    BACKGROUND_VOLUME, FfmpegTools, VideoInfo, aspect_hint, brand_frames, decoder_args, encoder_args,
    enhanced_prompt, fade_frame, fade_out_alpha, logo_card, logo_scene_alpha, mix_args,
    mix_background_audio, parse_frame_rate, parse_video_info,
};
use image::{Rgba, RgbaImage};
use std::path::Path;
use strum::IntoEnumIterator;

fn solid_frames(info: &VideoInfo, count: usize, value: u8) -> Vec<Result<Vec<u8>, herald_error::MediaError>> {
    (0..count).map(|_| Ok(vec![value; info.frame_len()])).collect()
}

#[test]
fn test_fade_frame_scales_towards_black() {
    let mut frame = vec![200u8, 100, 50];
    fade_frame(&mut frame, 0.5);
    assert_eq!(frame, vec![100, 50, 25]);

    let mut untouched = vec![200u8, 100, 50];
    fade_frame(&mut untouched, 1.0);
    assert_eq!(untouched, vec![200, 100, 50]);

    let mut black = vec![200u8, 100, 50];
    fade_frame(&mut black, 0.0);
    assert_eq!(black, vec![0, 0, 0]);
}

#[test]
fn test_fade_out_reaches_black_on_last_frame() {
    assert_eq!(fade_out_alpha(29, 30), 0.0);
    assert!((fade_out_alpha(0, 30) - 29.0 / 30.0).abs() < 1e-6);
    assert!(fade_out_alpha(10, 30) > fade_out_alpha(11, 30));
}

#[test]
fn test_logo_scene_fades_in_and_out() {
    let fps = 24;
    assert_eq!(logo_scene_alpha(0, fps), 0.0);
    assert!((logo_scene_alpha(6, fps) - 0.5).abs() < 1e-6);
    assert_eq!(logo_scene_alpha(12, fps), 1.0);
    assert_eq!(logo_scene_alpha(24, fps), 1.0);
    assert_eq!(logo_scene_alpha(36, fps), 1.0);
    assert!(logo_scene_alpha(47, fps) < 1.0);
}

#[test]
fn test_brand_frames_fades_last_second_and_appends_logo() {
    let info = VideoInfo::new(4, 2, 10, false);
    let card = logo_card(4, 2, &RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])));
    let mut sink: Vec<Vec<u8>> = Vec::new();

    let written = brand_frames(solid_frames(&info, 25, 200), &info, Some(&card), &mut sink).unwrap();

    // 25 clip frames plus two seconds of logo
    assert_eq!(written, 45);
    assert_eq!(sink.len(), 45);

    // Untouched before the last second
    assert!(sink[..15].iter().all(|f| f.iter().all(|&b| b == 200)));
    // Fading through the last second, black at the end
    assert!(sink[15][0] < 200);
    assert!(sink[24].iter().all(|&b| b == 0));
    // Logo scene opens from black
    assert!(sink[25].iter().all(|&b| b == 0));
    assert!(sink[35].iter().any(|&b| b > 0));
}

#[test]
fn test_brand_frames_short_clip_fades_whole_clip() {
    let info = VideoInfo::new(2, 2, 30, false);
    let mut sink: Vec<Vec<u8>> = Vec::new();

    let written = brand_frames(solid_frames(&info, 5, 100), &info, None, &mut sink).unwrap();

    assert_eq!(written, 5);
    assert!(sink[0][0] < 100);
    assert!(sink[4].iter().all(|&b| b == 0));
}

#[test]
fn test_logo_card_centres_and_limits_logo() {
    let logo = RgbaImage::from_pixel(400, 400, Rgba([255, 0, 0, 255]));
    let card = logo_card(1000, 500, &logo);

    assert_eq!(card.dimensions(), (1000, 500));
    // Logo scaled to at most 40 % of the height (200 px) and centred
    assert_eq!(card.get_pixel(500, 250).0, [255, 0, 0]);
    assert_eq!(card.get_pixel(500, 20).0, [255, 255, 255]);
    assert_eq!(card.get_pixel(200, 250).0, [255, 255, 255]);
}

#[test]
fn test_logo_card_keeps_small_logo_size() {
    let logo = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));
    let card = logo_card(100, 100, &logo);

    assert_eq!(card.get_pixel(50, 50).0, [0, 0, 255]);
    assert_eq!(card.get_pixel(44, 50).0, [255, 255, 255]);
}

#[test]
fn test_parse_video_info() {
    let json = r#"{
        "streams": [
            {"codec_type": "video", "width": 1280, "height": 720, "r_frame_rate": "30000/1001", "avg_frame_rate": "30000/1001"},
            {"codec_type": "audio"}
        ]
    }"#;
    let info = parse_video_info(json).unwrap();

    assert_eq!(info, VideoInfo::new(1280, 720, 30, true));
    assert_eq!(info.frame_len(), 1280 * 720 * 3);
}

#[test]
fn test_parse_video_info_without_video_stream() {
    assert!(parse_video_info(r#"{"streams": [{"codec_type": "audio"}]}"#).is_err());
    assert!(parse_video_info("not json").is_err());
}

#[test]
fn test_parse_frame_rate() {
    assert_eq!(parse_frame_rate("25/1"), Some(25.0));
    assert_eq!(parse_frame_rate("24"), Some(24.0));
    assert_eq!(parse_frame_rate("0/0"), None);
    assert_eq!(parse_frame_rate("abc"), None);
}

#[test]
fn test_ffmpeg_argument_shapes() {
    let info = VideoInfo::new(720, 1280, 24, false);

    let decode = decoder_args(Path::new("/tmp/in.mp4"));
    assert!(decode.windows(2).any(|w| w == ["-pix_fmt", "rgb24"]));
    assert_eq!(decode.last().map(String::as_str), Some("pipe:1"));

    let encode = encoder_args(&info, Path::new("/tmp/out.mp4"));
    assert!(encode.windows(2).any(|w| w == ["-s", "720x1280"]));
    assert!(encode.windows(2).any(|w| w == ["-r", "24"]));
    assert_eq!(encode.last().map(String::as_str), Some("/tmp/out.mp4"));
}

#[test]
fn test_mix_args_loop_volume_and_duration() {
    let args = mix_args(
        Path::new("v.mp4"),
        Path::new("bg.mp3"),
        Path::new("out.mp4"),
        7.5,
        true,
    );

    assert!(args.windows(4).any(|w| w == ["-stream_loop", "-1", "-i", "bg.mp3"]));
    assert!(args.windows(2).any(|w| w == ["-t", "7.500"]));
    let filter = &args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1];
    assert!(filter.contains(&format!("volume={}", BACKGROUND_VOLUME)));
    assert!(filter.contains("amix=inputs=2"));

    let silent = mix_args(Path::new("v.mp4"), Path::new("bg.mp3"), Path::new("o.mp4"), 3.0, false);
    assert!(!silent.iter().any(|a| a.contains("amix")));
}

#[test]
fn test_missing_music_leaves_video_unchanged() {
    let dir = tempfile::TempDir::new().unwrap();
    let video = dir.path().join("enhanced.mp4");
    let output = dir.path().join("final.mp4");
    std::fs::write(&video, b"encoded frames").unwrap();

    let mixed = mix_background_audio(
        &FfmpegTools::default(),
        &video,
        &dir.path().join("no-such-track.mp3"),
        &output,
        5.0,
        false,
    )
    .unwrap();

    assert!(!mixed);
    assert_eq!(std::fs::read(&output).unwrap(), b"encoded frames");
}

#[test]
fn test_failed_mix_leaves_video_unchanged() {
    let dir = tempfile::TempDir::new().unwrap();
    let video = dir.path().join("enhanced.mp4");
    let audio = dir.path().join("track.mp3");
    let output = dir.path().join("final.mp4");
    std::fs::write(&video, b"encoded frames").unwrap();
    std::fs::write(&audio, b"not audio").unwrap();
    let tools = FfmpegTools::new(dir.path().join("missing-ffmpeg"), "ffprobe");

    let mixed = mix_background_audio(&tools, &video, &audio, &output, 5.0, false).unwrap();

    assert!(!mixed);
    assert_eq!(std::fs::read(&output).unwrap(), b"encoded frames");
}

#[test]
fn test_aspect_hints() {
    assert_eq!(
        aspect_hint(Platform::Instagram, ContentType::Story),
        "Vertical aspect ratio (9:16)"
    );
    assert_eq!(
        aspect_hint(Platform::LinkedIn, ContentType::ImagePost),
        "Portrait aspect ratio (4:5)"
    );
    assert_eq!(aspect_hint(Platform::Facebook, ContentType::TextPost), "");

    for platform in Platform::iter() {
        for content_type in ContentType::iter() {
            let prompt = enhanced_prompt("scene", "brand", platform, content_type);
            assert!(prompt.starts_with("scene - IMPORTANT: brand. "));
        }
    }
}
