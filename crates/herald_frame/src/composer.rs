//! Platform-sized branded frames.

use crate::font::{load_font, measure, text_mask};
use crate::geometry::{fit_inside, round_corners};
use crate::layout::{FrameLayout, canvas_size, is_story_layout};
use crate::overlay::{TextOverlayRenderer, tint};
use crate::palette::BrandPalette;
use ab_glyph::FontArc;
use herald_core::{ContentType, Platform};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Inputs for one composed frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameRequest<'a> {
    /// Generated artwork
    pub main: &'a RgbaImage,
    /// Company logo
    pub logo: &'a RgbaImage,
    /// Target platform
    pub platform: Platform,
    /// Post format
    pub content_type: ContentType,
    /// Short copy drawn over the artwork; blank to skip
    pub overlay_text: &'a str,
    /// Footer text, normally the company website
    pub footer: &'a str,
}

/// Builds branded frames: brand rails, rounded artwork, overlay copy, logo
/// and website footer on a white canvas.
#[derive(Debug, Clone)]
pub struct FrameComposer {
    layout: FrameLayout,
    font: Option<FontArc>,
    overlay: TextOverlayRenderer,
}

impl FrameComposer {
    /// Composer with an explicit font (or none).
    pub fn new(layout: FrameLayout, font: Option<FontArc>) -> Self {
        let overlay =
            TextOverlayRenderer::new(font.clone(), *layout.corner_radius(), *layout.wash_opacity());
        Self {
            layout,
            font,
            overlay,
        }
    }

    /// Composer whose font is resolved from `font_path` and system fonts.
    pub fn with_font_path(layout: FrameLayout, font_path: Option<&Path>) -> Self {
        Self::new(layout, load_font(font_path))
    }

    /// Layout in use.
    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Compose a frame. The result always has exactly the canvas size for
    /// the request's platform and format.
    #[tracing::instrument(skip(self, request), fields(platform = %request.platform, content_type = %request.content_type))]
    pub fn compose(&self, request: &FrameRequest<'_>) -> RgbaImage {
        let (width, height) = canvas_size(request.platform, request.content_type);
        let story = is_story_layout(request.platform, request.content_type);
        let palette = BrandPalette::from_logo(request.logo);
        let layout = &self.layout;

        let mut frame = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

        if !story {
            self.draw_rails(&mut frame, *palette.dominant());
        }

        let area = layout.content_area(width, height, !story);
        let fitted = fit_inside(request.main, area.width, area.height);
        let fitted = round_corners(&fitted, *layout.corner_radius());
        let main_x = i64::from(area.x) + (i64::from(area.width) - i64::from(fitted.width())) / 2;
        let main_y = i64::from(area.y) + (i64::from(area.height) - i64::from(fitted.height())) / 2;
        image::imageops::overlay(&mut frame, &fitted, main_x, main_y);

        if story {
            return frame;
        }

        if !request.overlay_text.trim().is_empty() {
            self.overlay.render(
                &mut frame,
                main_x,
                main_y,
                fitted.width(),
                fitted.height(),
                request.overlay_text,
            );
        }

        let logo_max_w = (width as f32 * layout.logo_width_ratio()) as u32;
        let logo = fit_inside(request.logo, logo_max_w, *layout.logo_band());
        image::imageops::overlay(
            &mut frame,
            &logo,
            i64::from(area.x),
            i64::from(*layout.top_margin()),
        );

        self.draw_footer(&mut frame, request.footer, *palette.dominant());
        frame
    }

    fn draw_rails(&self, frame: &mut RgbaImage, color: Rgba<u8>) {
        let (width, height) = frame.dimensions();
        let rail = (*self.layout.rail_width()).min(width);
        for y in 0..height {
            for x in (0..rail).chain(width - rail..width) {
                frame.put_pixel(x, y, color);
            }
        }
    }

    fn draw_footer(&self, frame: &mut RgbaImage, footer: &str, color: Rgba<u8>) {
        let Some(font) = &self.font else {
            tracing::warn!("No font available; skipping footer");
            return;
        };
        let footer = footer.trim();
        if footer.is_empty() {
            return;
        }

        let (width, height) = frame.dimensions();
        let layout = &self.layout;
        let size = *layout.footer_font_size() as f32;
        let (text_w, text_h) = measure(font, size, footer);
        let right = i64::from(width) - i64::from(layout.rail_width() + layout.inner_padding());
        let x = right - i64::from(text_w);
        let y = i64::from(height) - i64::from(*layout.bottom_margin())
            + i64::from(*layout.footer_offset());

        // Descenders can reach past the measured height.
        let mask_h = text_h + text_h / 2;
        let mask = text_mask(font, size, footer, text_w.max(1), mask_h.max(1), 0, 0);
        image::imageops::overlay(frame, &tint(&mask, color), x, y);
    }
}
