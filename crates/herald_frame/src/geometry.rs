//! Aspect-preserving resize and rounded-corner masking.

use image::{RgbaImage, imageops::FilterType};

/// Dimensions of `(width, height)` scaled to fit inside `(box_w, box_h)`.
///
/// The binding side is chosen by comparing aspect ratios. Both sides are at
/// least 1 px and never exceed the box.
///
/// # Examples
///
/// ```
/// use herald_frame::fit_dimensions;
///
/// assert_eq!(fit_dimensions(2000, 1000, 800, 800), (800, 400));
/// assert_eq!(fit_dimensions(1000, 2000, 800, 800), (400, 800));
/// ```
pub fn fit_dimensions(width: u32, height: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let box_w = box_w.max(1);
    let box_h = box_h.max(1);
    if width == 0 || height == 0 {
        return (1, 1);
    }

    let image_ratio = f64::from(width) / f64::from(height);
    let box_ratio = f64::from(box_w) / f64::from(box_h);

    let (new_w, new_h) = if image_ratio > box_ratio {
        (box_w, (f64::from(box_w) / image_ratio) as u32)
    } else {
        ((f64::from(box_h) * image_ratio) as u32, box_h)
    };
    (new_w.clamp(1, box_w), new_h.clamp(1, box_h))
}

/// Resize `image` to fit inside the box, preserving aspect ratio (Lanczos3).
pub fn fit_inside(image: &RgbaImage, box_w: u32, box_h: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (new_w, new_h) = fit_dimensions(width, height, box_w, box_h);
    image::imageops::resize(image, new_w, new_h, FilterType::Lanczos3)
}

/// Coverage of the pixel at `(x, y)` by a rounded rectangle filling a
/// `width` x `height` area, in `0.0..=1.0`.
pub fn rounded_coverage(x: u32, y: u32, width: u32, height: u32, radius: f64) -> f64 {
    let radius = radius.min(f64::from(width.min(height)) / 2.0).max(0.0);
    if radius <= 0.0 {
        return 1.0;
    }

    let cx = f64::from(x) + 0.5;
    let cy = f64::from(y) + 0.5;
    let w = f64::from(width);
    let h = f64::from(height);

    let corner_x = if cx < radius {
        Some(radius)
    } else if cx > w - radius {
        Some(w - radius)
    } else {
        None
    };
    let corner_y = if cy < radius {
        Some(radius)
    } else if cy > h - radius {
        Some(h - radius)
    } else {
        None
    };

    match (corner_x, corner_y) {
        (Some(ox), Some(oy)) => {
            let distance = ((cx - ox).powi(2) + (cy - oy).powi(2)).sqrt();
            (radius - distance + 0.5).clamp(0.0, 1.0)
        }
        _ => 1.0,
    }
}

/// Replace the alpha channel with an anti-aliased rounded-rectangle mask.
pub fn round_corners(image: &RgbaImage, radius: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut rounded = image.clone();
    for (x, y, pixel) in rounded.enumerate_pixels_mut() {
        let coverage = rounded_coverage(x, y, width, height, f64::from(radius));
        pixel[3] = (coverage * 255.0).round() as u8;
    }
    rounded
}
