//! Canvas sizes and layout constants.

use herald_core::{ContentType, Platform};

/// Canvas size for a platform and post format.
///
/// Total over every pair; pairs without a dedicated size get 1200x1200.
///
/// # Examples
///
/// ```
/// use herald_core::{ContentType, Platform};
/// use herald_frame::canvas_size;
///
/// assert_eq!(canvas_size(Platform::Instagram, ContentType::Story), (1080, 1920));
/// assert_eq!(canvas_size(Platform::LinkedIn, ContentType::FeedImage), (1200, 1200));
/// ```
pub fn canvas_size(platform: Platform, content_type: ContentType) -> (u32, u32) {
    match (platform, content_type) {
        (Platform::Instagram, ContentType::FeedImage) => (1080, 1080),
        (Platform::Instagram, ContentType::Story) => (1080, 1920),
        (Platform::Facebook, ContentType::ImagePost) => (1200, 1500),
        (Platform::LinkedIn, ContentType::ImagePost) => (1200, 1350),
        _ => (1200, 1200),
    }
}

/// Full-bleed story layout: no rails, logo, overlay text or footer.
pub fn is_story_layout(platform: Platform, content_type: ContentType) -> bool {
    platform == Platform::Instagram && content_type == ContentType::Story
}

/// Tunable layout constants for composed frames.
///
/// # Examples
///
/// ```
/// use herald_frame::FrameLayoutBuilder;
///
/// let layout = FrameLayoutBuilder::default().rail_width(30u32).build().unwrap();
/// assert_eq!(*layout.rail_width(), 30);
/// assert_eq!(*layout.logo_band(), 160);
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder, derive_getters::Getters)]
pub struct FrameLayout {
    /// Width of the brand-coloured side rails
    #[builder(default = "44")]
    rail_width: u32,
    /// Horizontal gap between rail and content
    #[builder(default = "40")]
    inner_padding: u32,
    /// Space above the logo band
    #[builder(default = "20")]
    top_margin: u32,
    /// Height reserved for the logo
    #[builder(default = "160")]
    logo_band: u32,
    /// Space reserved below the content for the footer
    #[builder(default = "60")]
    bottom_margin: u32,
    /// Extra gap between content and footer
    #[builder(default = "40")]
    content_gap: u32,
    /// Maximum logo width as a fraction of canvas width
    #[builder(default = "0.55")]
    logo_width_ratio: f32,
    /// Footer text size in px
    #[builder(default = "30")]
    footer_font_size: u32,
    /// Footer text offset below the bottom margin line
    #[builder(default = "10")]
    footer_offset: u32,
    /// Radius for photographic elements
    #[builder(default = "15")]
    corner_radius: u32,
    /// Opacity of the light wash under overlay text
    #[builder(default = "0.10")]
    wash_opacity: f32,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            rail_width: 44,
            inner_padding: 40,
            top_margin: 20,
            logo_band: 160,
            bottom_margin: 60,
            content_gap: 40,
            logo_width_ratio: 0.55,
            footer_font_size: 30,
            footer_offset: 10,
            corner_radius: 15,
            wash_opacity: 0.10,
        }
    }
}

/// Interior box that receives the main image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentArea {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl FrameLayout {
    /// Interior box for a canvas, with or without rails.
    pub fn content_area(&self, canvas_w: u32, canvas_h: u32, rails: bool) -> ContentArea {
        let inset = if rails {
            self.rail_width + self.inner_padding
        } else {
            self.inner_padding
        };
        let y = self.top_margin + self.logo_band;
        ContentArea {
            x: inset,
            y,
            width: canvas_w.saturating_sub(2 * inset),
            height: canvas_h.saturating_sub(y + self.bottom_margin + self.content_gap),
        }
    }
}
