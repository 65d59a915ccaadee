//! Font resolution and glyph masks.

use ab_glyph::{FontArc, PxScale};
use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};

const BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const REGULAR_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Candidate font files in resolution order: the configured path, known
/// bold system fonts, then any known system font.
pub fn font_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(BOLD_FONTS.iter().map(PathBuf::from))
        .chain(REGULAR_FONTS.iter().map(PathBuf::from))
        .collect()
}

/// Load the first usable font, or `None` with a warning.
#[tracing::instrument]
pub fn load_font(configured: Option<&Path>) -> Option<FontArc> {
    for path in font_candidates(configured) {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "Loaded font");
                return Some(font);
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Unreadable font file"),
        }
    }
    tracing::warn!("No usable font found; text layers will be skipped");
    None
}

/// Width and height of `text` at `size` px.
pub fn measure(font: &FontArc, size: f32, text: &str) -> (u32, u32) {
    imageproc::drawing::text_size(PxScale::from(size), font, text)
}

/// Glyph coverage of `text` drawn at `(x, y)` on a `width` x `height` mask.
pub fn text_mask(
    font: &FontArc,
    size: f32,
    text: &str,
    width: u32,
    height: u32,
    x: i32,
    y: i32,
) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    imageproc::drawing::draw_text_mut(
        &mut mask,
        Luma([255u8]),
        x,
        y,
        PxScale::from(size),
        font,
        text,
    );
    mask
}
