//! Branded frame composition for social media images.
//!
//! Turns a generated image and a company logo into a platform-sized post:
//! logo colours drive the side rails and footer, the artwork is fitted and
//! rounded, and overlay copy gets layered effects so it stays legible on
//! any background.
//!
//! Everything here is pure CPU work over in-memory images. Callers on an
//! async runtime should run [`FrameComposer::compose`] on a blocking thread.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod composer;
mod font;
mod geometry;
mod layout;
mod overlay;
mod palette;

pub use composer::{FrameComposer, FrameRequest};
pub use font::{font_candidates, load_font, measure, text_mask};
pub use geometry::{fit_dimensions, fit_inside, round_corners, rounded_coverage};
pub use layout::{
    ContentArea, FrameLayout, FrameLayoutBuilder, FrameLayoutBuilderError, canvas_size,
    is_story_layout,
};
pub use overlay::{TextOverlayRenderer, clamp_overlay_text, overlay_font_size, stroke_width};
pub use palette::{BrandPalette, FALLBACK_DOMINANT, FALLBACK_SECONDARY, extract_colors};
