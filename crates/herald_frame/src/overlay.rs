//! Legible text over photographic backgrounds.
//!
//! Text is built up on a transparent layer cropped to the text bounds plus
//! room for blur and shadows, then composited onto the frame:
//!
//! 1. light rounded wash over the whole region
//! 2. dark glow, blurred
//! 3. three offset drop shadows
//! 4. black outline from angular offsets and a dilated glyph mask
//! 5. white fill
//! 6. unsharp mask over the text layer

use crate::font::{measure, text_mask};
use crate::geometry::round_corners;
use ab_glyph::FontArc;
use image::{GrayImage, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;

const WASH: [u8; 3] = [0xF1, 0xEE, 0xE9];
const GLOW_ALPHA: u8 = 120;
const GLOW_SIGMA: f32 = 8.0;
const GLOW_OFFSETS: [(i32, i32); 5] = [(0, 0), (2, 2), (-2, -2), (2, -2), (-2, 2)];
/// (offset, alpha, blur sigma), far to near.
const SHADOWS: [(i32, u8, f32); 3] = [(7, 180, 5.0), (5, 200, 3.0), (3, 220, 2.0)];
const OUTLINE_STEP_DEGREES: usize = 30;
const SHARPEN_SIGMA: f32 = 1.0;
const SHARPEN_THRESHOLD: i32 = 2;

/// Font size for a text box: `max(32, min(w, h) / 18)`.
pub fn overlay_font_size(width: u32, height: u32) -> u32 {
    (width.min(height) / 18).max(32)
}

/// Outline width for a font size: `max(3, size / 12)`.
pub fn stroke_width(font_size: u32) -> u32 {
    (font_size / 12).max(3)
}

/// Shorten overlay copy: text longer than six words keeps its first four.
///
/// # Examples
///
/// ```
/// use herald_frame::clamp_overlay_text;
///
/// assert_eq!(clamp_overlay_text("Brew Better Mornings Daily"), "Brew Better Mornings Daily");
/// assert_eq!(
///     clamp_overlay_text("Our new seasonal blend is finally here for you"),
///     "Our new seasonal blend"
/// );
/// ```
pub fn clamp_overlay_text(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > 6 {
        words[..4].join(" ")
    } else {
        words.join(" ")
    }
}

/// Renders centred white text with legibility effects.
#[derive(Debug, Clone)]
pub struct TextOverlayRenderer {
    font: Option<FontArc>,
    corner_radius: u32,
    wash_opacity: f32,
}

impl TextOverlayRenderer {
    /// Create a renderer. Without a font, only the wash is drawn.
    pub fn new(font: Option<FontArc>, corner_radius: u32, wash_opacity: f32) -> Self {
        Self {
            font,
            corner_radius,
            wash_opacity,
        }
    }

    /// Draw `text` centred in the box at `(x, y)` of size `width` x `height`.
    ///
    /// Never fails: a missing font skips the text layers with a warning.
    pub fn render(&self, frame: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, text: &str) {
        if width == 0 || height == 0 {
            return;
        }
        self.draw_wash(frame, x, y, width, height);

        let Some(font) = &self.font else {
            tracing::warn!("No font available; skipping overlay text");
            return;
        };
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let size = overlay_font_size(width, height);
        let (text_w, text_h) = measure(font, size as f32, text);
        let text_x = x + (i64::from(width) - i64::from(text_w)) / 2;
        let text_y = y + (i64::from(height) - i64::from(text_h)) / 2;

        let layer = text_layer(font, size, text, text_w, text_h);
        let pad = layer_padding(size);
        image::imageops::overlay(frame, &layer, text_x - pad, text_y - pad);
    }

    fn draw_wash(&self, frame: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32) {
        let alpha = (255.0 * self.wash_opacity).clamp(0.0, 255.0) as u8;
        let wash = RgbaImage::from_pixel(width, height, Rgba([WASH[0], WASH[1], WASH[2], 255]));
        let mut wash = round_corners(&wash, self.corner_radius);
        for pixel in wash.pixels_mut() {
            pixel[3] = ((u16::from(pixel[3]) * u16::from(alpha)) / 255) as u8;
        }
        image::imageops::overlay(frame, &wash, x, y);
    }
}

/// Margin around the text bounds that holds glow, shadows and outline.
fn layer_padding(size: u32) -> i64 {
    let blur_reach = (GLOW_SIGMA * 3.0).ceil() as i64;
    let shadow_reach = i64::from(SHADOWS[0].0) + (SHADOWS[0].2 * 3.0).ceil() as i64;
    blur_reach.max(shadow_reach) + i64::from(stroke_width(size)) + 2
}

/// Build the composited text effects on a transparent layer.
fn text_layer(font: &FontArc, size: u32, text: &str, text_w: u32, text_h: u32) -> RgbaImage {
    let pad = layer_padding(size);
    let width = text_w + 2 * pad as u32;
    let height = text_h + 2 * pad as u32;
    let origin = pad as i32;
    let scale = size as f32;
    let stamp = |dx: i32, dy: i32| text_mask(font, scale, text, width, height, origin + dx, origin + dy);

    let mut layer = RgbaImage::new(width, height);

    let glow = GLOW_OFFSETS
        .iter()
        .map(|(dx, dy)| stamp(*dx, *dy))
        .reduce(|acc, mask| union(&acc, &mask))
        .unwrap_or_else(|| GrayImage::new(width, height));
    let glow = image::imageops::blur(&tint(&glow, Rgba([0, 0, 0, GLOW_ALPHA])), GLOW_SIGMA);
    image::imageops::overlay(&mut layer, &glow, 0, 0);

    for (offset, alpha, sigma) in SHADOWS {
        let shadow = tint(&stamp(offset, offset), Rgba([0, 0, 0, alpha]));
        let shadow = image::imageops::blur(&shadow, sigma);
        image::imageops::overlay(&mut layer, &shadow, 0, 0);
    }

    let stroke = stroke_width(size);
    let base = stamp(0, 0);
    let mut outline = imageproc::morphology::dilate(&base, Norm::L2, stroke.min(255) as u8);
    for step in (0..360).step_by(OUTLINE_STEP_DEGREES) {
        let radians = (step as f64).to_radians();
        let dx = (f64::from(stroke) * radians.cos()) as i32;
        let dy = (f64::from(stroke) * radians.sin()) as i32;
        outline = union(&outline, &stamp(dx, dy));
    }
    image::imageops::overlay(&mut layer, &tint(&outline, Rgba([0, 0, 0, 255])), 0, 0);

    image::imageops::overlay(&mut layer, &tint(&base, Rgba([255, 255, 255, 255])), 0, 0);

    image::imageops::unsharpen(&layer, SHARPEN_SIGMA, SHARPEN_THRESHOLD)
}

/// Per-pixel maximum of two masks of equal size.
fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let mut out = a.clone();
    for (dst, src) in out.pixels_mut().zip(b.pixels()) {
        dst[0] = dst[0].max(src[0]);
    }
    out
}

/// Colour a coverage mask, scaling the colour's alpha by coverage.
pub(crate) fn tint(mask: &GrayImage, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        let coverage = u16::from(mask.get_pixel(x, y)[0]);
        let alpha = (coverage * u16::from(color[3]) / 255) as u8;
        Rgba([color[0], color[1], color[2], alpha])
    })
}
