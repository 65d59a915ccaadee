//! Media rendering for Herald content items.
//!
//! The pipeline turns a content item into uploaded media:
//!
//! - **Images**: prompt enrichment, [`TogetherImageClient`] generation, brand
//!   framing with [`herald_frame::FrameComposer`], PNG upload.
//! - **Videos**: [`ReplicateVideoClient`] generation, fade-out and logo scene
//!   via ffmpeg ([`postprocess_video`]), optional background music
//!   ([`mix_background_audio`]), MP4 upload.
//! - **Text posts**: no media; the publishable body is returned.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audio;
mod fetch;
mod pipeline;
mod prompt;
mod replicate;
mod together;
mod video;

pub use audio::{BACKGROUND_VOLUME, mix_args, mix_background_audio};
pub use fetch::MediaFetcher;
pub use pipeline::{
    AttachedMedia, MediaPipeline, PipelineSettings, PipelineSettingsBuilder,
    PipelineSettingsBuilderError, RenderOutcome, RenderRequest, RenderedMedia, attach_custom_media,
};
pub use prompt::{aspect_hint, enhanced_prompt};
pub use replicate::{DEFAULT_VIDEO_MODEL, Prediction, REPLICATE_API_BASE, ReplicateVideoClient};
pub use together::{
    DEFAULT_IMAGE_MODEL, ImageDatum, ImageGenerationRequest, ImageGenerationResponse,
    TOGETHER_API_BASE, TogetherImageClient,
};
pub use video::{
    FfmpegTools, FrameSink, LOGO_MAX_RATIO, LOGO_SCENE_SECONDS, PostprocessReport, VideoInfo,
    brand_frames, decoder_args, encoder_args, fade_frame, fade_out_alpha, logo_card,
    logo_scene_alpha, parse_frame_rate, parse_video_info, postprocess_video, read_video_info,
};
