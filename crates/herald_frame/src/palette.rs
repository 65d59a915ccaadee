//! Dominant colour extraction by k-means clustering.

use image::{Rgba, RgbaImage, imageops::FilterType};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Teal used when a logo has too few opaque pixels.
pub const FALLBACK_DOMINANT: Rgba<u8> = Rgba([0, 179, 173, 255]);
/// Purple used when a logo has too few opaque pixels.
pub const FALLBACK_SECONDARY: Rgba<u8> = Rgba([44, 27, 71, 255]);

const SAMPLE_SIDE: f64 = 100.0;
const OPAQUE_THRESHOLD: u8 = 200;
const MAX_ITERATIONS: usize = 300;
const SEED: u64 = 42;

/// Colours derived from a company logo.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct BrandPalette {
    dominant: Rgba<u8>,
    secondary: Rgba<u8>,
    additional: Vec<Rgba<u8>>,
}

impl BrandPalette {
    /// Extract three clusters from the logo; missing entries fall back to teal and purple.
    pub fn from_logo(logo: &RgbaImage) -> Self {
        let mut colors = extract_colors(logo, 3).into_iter();
        let dominant = colors.next().unwrap_or(FALLBACK_DOMINANT);
        let secondary = colors.next().unwrap_or(FALLBACK_SECONDARY);
        Self {
            dominant,
            secondary,
            additional: colors.collect(),
        }
    }
}

/// Dominant colours of `logo`, most populous first, at most `k` of them.
///
/// The logo is downsampled so its shorter side is about 100 px and pixels
/// with alpha at or below 200 are ignored. Returns the fallback palette,
/// truncated to `k`, when fewer than `k` opaque pixels remain. Deterministic
/// for a given input.
pub fn extract_colors(logo: &RgbaImage, k: usize) -> Vec<Rgba<u8>> {
    if k == 0 {
        return Vec::new();
    }
    let samples = opaque_samples(logo);
    if samples.len() < k {
        let mut fallback = vec![FALLBACK_DOMINANT, FALLBACK_SECONDARY];
        fallback.truncate(k);
        return fallback;
    }

    let clusters = kmeans(&samples, k);
    clusters
        .into_iter()
        .map(|(centroid, _)| {
            Rgba([
                channel(centroid[0]),
                channel(centroid[1]),
                channel(centroid[2]),
                255,
            ])
        })
        .collect()
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn opaque_samples(logo: &RgbaImage) -> Vec<[f64; 3]> {
    let (width, height) = logo.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let factor = SAMPLE_SIDE / f64::from(width.min(height));
    let sample_w = ((f64::from(width) * factor) as u32).max(1);
    let sample_h = ((f64::from(height) * factor) as u32).max(1);
    let small = image::imageops::resize(logo, sample_w, sample_h, FilterType::Lanczos3);

    small
        .pixels()
        .filter(|pixel| pixel[3] > OPAQUE_THRESHOLD)
        .map(|pixel| [f64::from(pixel[0]), f64::from(pixel[1]), f64::from(pixel[2])])
        .collect()
}

fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

fn nearest(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    centroids
        .iter()
        .enumerate()
        .map(|(index, centroid)| (index, distance_sq(point, centroid)))
        .fold((0, f64::INFINITY), |best, candidate| {
            if candidate.1 < best.1 { candidate } else { best }
        })
        .0
}

/// k-means++ seeding.
fn seed_centroids(points: &[[f64; 3]], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|point| {
                centroids
                    .iter()
                    .map(|centroid| distance_sq(point, centroid))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            // Every point already coincides with a centroid.
            centroids.push(points[rng.gen_range(0..points.len())]);
            continue;
        }

        let mut target = rng.gen_range(0.0..total);
        let mut chosen = points.len() - 1;
        for (index, weight) in weights.iter().enumerate() {
            if target < *weight {
                chosen = index;
                break;
            }
            target -= weight;
        }
        centroids.push(points[chosen]);
    }
    centroids
}

/// Lloyd iterations; returns non-empty clusters as (centroid, member count),
/// largest first.
fn kmeans(points: &[[f64; 3]], k: usize) -> Vec<([f64; 3], usize)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut centroids = seed_centroids(points, k, &mut rng);
    let mut assignments = vec![usize::MAX; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (point, assignment) in points.iter().zip(assignments.iter_mut()) {
            let cluster = nearest(point, &centroids);
            if *assignment != cluster {
                *assignment = cluster;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (point, cluster) in points.iter().zip(&assignments) {
            counts[*cluster] += 1;
            for c in 0..3 {
                sums[*cluster][c] += point[c];
            }
        }
        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            if counts[cluster] > 0 {
                let n = counts[cluster] as f64;
                *centroid = [sums[cluster][0] / n, sums[cluster][1] / n, sums[cluster][2] / n];
            }
        }
    }

    let mut counts = vec![0usize; k];
    for cluster in &assignments {
        counts[*cluster] += 1;
    }
    let mut clusters: Vec<([f64; 3], usize)> = centroids
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .collect();
    clusters.sort_by(|a, b| b.1.cmp(&a.1));
    clusters
}
