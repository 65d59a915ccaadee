use herald_core::{ContentType, Platform};
use herald_frame::{
    BrandPalette, FALLBACK_DOMINANT, FALLBACK_SECONDARY, FrameComposer, FrameLayout,
    FrameRequest, canvas_size, clamp_overlay_text, extract_colors, fit_dimensions, fit_inside,
    overlay_font_size, round_corners, stroke_width,
};
use image::{Rgba, RgbaImage};
use strum::IntoEnumIterator;

fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Left half red, right third blue, rest green.
fn striped_logo() -> RgbaImage {
    RgbaImage::from_fn(300, 100, |x, _| {
        if x < 150 {
            Rgba([220, 20, 20, 255])
        } else if x < 200 {
            Rgba([20, 200, 20, 255])
        } else {
            Rgba([20, 20, 220, 255])
        }
    })
}

#[test]
fn test_canvas_size_lookup() {
    assert_eq!(canvas_size(Platform::Instagram, ContentType::FeedImage), (1080, 1080));
    assert_eq!(canvas_size(Platform::Instagram, ContentType::Story), (1080, 1920));
    assert_eq!(canvas_size(Platform::Facebook, ContentType::ImagePost), (1200, 1500));
    assert_eq!(canvas_size(Platform::LinkedIn, ContentType::ImagePost), (1200, 1350));
    assert_eq!(canvas_size(Platform::Facebook, ContentType::Story), (1200, 1200));
    assert_eq!(canvas_size(Platform::LinkedIn, ContentType::TextPost), (1200, 1200));
}

#[test]
fn test_composed_frame_matches_canvas_for_every_pair() {
    let composer = FrameComposer::new(FrameLayout::default(), None);
    let main = solid(64, 48, [90, 120, 150, 255]);
    let logo = striped_logo();

    for platform in Platform::iter() {
        for content_type in ContentType::iter() {
            let frame = composer.compose(&FrameRequest {
                main: &main,
                logo: &logo,
                platform,
                content_type,
                overlay_text: "Fresh Roast Friday",
                footer: "acme.coffee",
            });
            assert_eq!(
                frame.dimensions(),
                canvas_size(platform, content_type),
                "{platform} {content_type}"
            );
        }
    }
}

#[test]
fn test_transparent_logo_yields_fallback_palette() {
    let logo = solid(200, 200, [255, 0, 0, 0]);
    assert_eq!(
        extract_colors(&logo, 3),
        vec![FALLBACK_DOMINANT, FALLBACK_SECONDARY]
    );

    let palette = BrandPalette::from_logo(&logo);
    assert_eq!(*palette.dominant(), FALLBACK_DOMINANT);
    assert_eq!(*palette.secondary(), FALLBACK_SECONDARY);
    assert!(palette.additional().is_empty());
}

#[test]
fn test_requested_colour_count_bounds_the_result() {
    let transparent = solid(200, 200, [255, 0, 0, 0]);
    assert!(extract_colors(&transparent, 0).is_empty());
    assert_eq!(extract_colors(&transparent, 1), vec![FALLBACK_DOMINANT]);

    assert!(extract_colors(&striped_logo(), 0).is_empty());
    assert!(extract_colors(&striped_logo(), 1).len() <= 1);
}

#[test]
fn test_semi_transparent_pixels_are_ignored() {
    let logo = solid(120, 120, [10, 10, 10, 200]);
    assert_eq!(extract_colors(&logo, 3)[0], FALLBACK_DOMINANT);
}

#[test]
fn test_dominant_color_is_most_populous_cluster() {
    let colors = extract_colors(&striped_logo(), 3);
    assert!(!colors.is_empty() && colors.len() <= 3);
    let dominant = colors[0];
    assert!(dominant[0] > 150 && dominant[1] < 80 && dominant[2] < 80, "{dominant:?}");
    assert_eq!(dominant[3], 255);
}

#[test]
fn test_extraction_is_deterministic() {
    let logo = striped_logo();
    assert_eq!(extract_colors(&logo, 3), extract_colors(&logo, 3));
}

#[test]
fn test_single_colour_logo_returns_one_cluster() {
    let colors = extract_colors(&solid(150, 150, [12, 34, 56, 255]), 3);
    assert_eq!(colors, vec![Rgba([12, 34, 56, 255])]);
}

#[test]
fn test_fit_inside_bounds_and_aspect() {
    let cases = [
        ((2000, 1000), (800, 800)),
        ((1000, 2000), (800, 800)),
        ((640, 480), (1032, 1130)),
        ((1, 5000), (300, 300)),
        ((5000, 1), (300, 300)),
    ];
    for ((w, h), (bw, bh)) in cases {
        let (fw, fh) = fit_dimensions(w, h, bw, bh);
        assert!(fw <= bw && fh <= bh, "{w}x{h} into {bw}x{bh} gave {fw}x{fh}");
        assert!(fw >= 1 && fh >= 1);
        assert!(fw == bw || fh == bh, "one side must bind");

        let source = w as f64 / h as f64;
        let fitted = fw as f64 / fh as f64;
        if fw > 10 && fh > 10 {
            assert!((source - fitted).abs() / source < 0.02, "{source} vs {fitted}");
        }
    }

    let fitted = fit_inside(&solid(400, 200, [0, 0, 0, 255]), 100, 100);
    assert_eq!(fitted.dimensions(), (100, 50));
}

#[test]
fn test_round_corners_masks_only_the_corners() {
    let rounded = round_corners(&solid(100, 60, [200, 100, 50, 255]), 15);
    assert_eq!(rounded.get_pixel(0, 0)[3], 0);
    assert_eq!(rounded.get_pixel(99, 59)[3], 0);
    assert_eq!(rounded.get_pixel(50, 30)[3], 255);
    assert_eq!(rounded.get_pixel(50, 0)[3], 255);
    assert_eq!(rounded.get_pixel(0, 30)[3], 255);
    let edge = rounded.get_pixel(4, 4)[3];
    assert!(edge > 0 && edge < 255, "corner edge should be anti-aliased, got {edge}");
}

#[test]
fn test_rails_use_dominant_colour_except_for_stories() {
    let composer = FrameComposer::new(FrameLayout::default(), None);
    let main = solid(64, 64, [90, 120, 150, 255]);
    let logo = solid(120, 120, [200, 30, 40, 255]);

    let feed = composer.compose(&FrameRequest {
        main: &main,
        logo: &logo,
        platform: Platform::Instagram,
        content_type: ContentType::FeedImage,
        overlay_text: "",
        footer: "acme.io",
    });
    assert_eq!(*feed.get_pixel(0, 540), Rgba([200, 30, 40, 255]));
    assert_eq!(*feed.get_pixel(1079, 540), Rgba([200, 30, 40, 255]));

    let story = composer.compose(&FrameRequest {
        main: &main,
        logo: &logo,
        platform: Platform::Instagram,
        content_type: ContentType::Story,
        overlay_text: "ignored",
        footer: "acme.io",
    });
    assert_eq!(*story.get_pixel(0, 960), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_main_image_is_centred_in_content_area() {
    let composer = FrameComposer::new(FrameLayout::default(), None);
    let main = solid(100, 100, [10, 200, 10, 255]);
    let logo = solid(50, 50, [0, 0, 0, 0]);
    let frame = composer.compose(&FrameRequest {
        main: &main,
        logo: &logo,
        platform: Platform::Facebook,
        content_type: ContentType::ImagePost,
        overlay_text: "",
        footer: "",
    });
    // Content area: x 84..1116, y 180..1400; square fit is 1032 wide, centred vertically.
    let centre = frame.get_pixel(600, 790);
    assert_eq!(*centre, Rgba([10, 200, 10, 255]));
    assert_eq!(*frame.get_pixel(600, 100), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_text_metrics() {
    assert_eq!(overlay_font_size(300, 200), 32);
    assert_eq!(overlay_font_size(1032, 1032), 57);
    assert_eq!(stroke_width(32), 3);
    assert_eq!(stroke_width(57), 4);
}

#[test]
fn test_clamp_overlay_text() {
    assert_eq!(clamp_overlay_text("  Bold   New Flavors "), "Bold New Flavors");
    assert_eq!(
        clamp_overlay_text("one two three four five six"),
        "one two three four five six"
    );
    assert_eq!(
        clamp_overlay_text("one two three four five six seven"),
        "one two three four"
    );
}
