//! Per-group feature measurements. A group returns `None` when the image is too small to
//! measure it.

use image::{GrayImage, RgbImage};
use std::collections::BTreeMap;

use super::clustering::kmeans;
use super::edges::{self, EdgeMap};
use crate::types::image::{
    ColorFeatures, Complexity, CompositionFeatures, QualityFeatures, Rating, RegionBrightness,
    ShapeFeatures, ShapeKind, TextureFeatures,
};

const DOMINANT_COLORS: usize = 5;
const MAX_COLOR_SAMPLES: usize = 4096;
const ANALYZED_CONTOURS: usize = 10;
const MIN_CONTOUR_PIXELS: usize = 5;

/// LBP ring offsets in circular order
const RING: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

pub fn color_features(image: &RgbImage) -> Option<ColorFeatures> {
    let pixels: Vec<[f64; 3]> = image.pixels().map(|p| p.0.map(f64::from)).collect();
    if pixels.is_empty() {
        return None;
    }

    let mut average_color = [0.0; 3];
    let mut color_variance = [0.0; 3];
    for channel in 0..3 {
        let (mean, std) = mean_std(pixels.iter().map(|p| p[channel]))?;
        average_color[channel] = mean;
        color_variance[channel] = std * std;
    }

    let step = (pixels.len() / MAX_COLOR_SAMPLES).max(1);
    let samples: Vec<[f64; 3]> = pixels.iter().step_by(step).copied().collect();
    let dominant_colors = kmeans(&samples, DOMINANT_COLORS)
        .into_iter()
        .map(|(center, _)| center.map(|c| c.clamp(0.0, 255.0) as u8))
        .collect();

    Some(ColorFeatures {
        dominant_colors,
        average_color,
        color_variance,
        color_diversity: color_variance.iter().sum::<f64>() / 3.0,
    })
}

pub fn texture_features(gray: &GrayImage, edge_map: &EdgeMap) -> Option<TextureFeatures> {
    let uniformity = lbp_uniformity(gray)?;
    let (_, contrast) = mean_std(gray.pixels().map(|p| p[0] as f64))?;
    let edge_density = edge_map.density();

    Some(TextureFeatures {
        uniformity,
        edge_density,
        contrast,
        complexity: Complexity::from_thresholds(edge_density, 0.05, 0.1),
    })
}

/// Share of interior pixels whose 8-neighbour binary pattern has at most two transitions
fn lbp_uniformity(gray: &GrayImage) -> Option<f64> {
    let (width, height) = (gray.width() as i64, gray.height() as i64);
    if width < 3 || height < 3 {
        return None;
    }

    let mut uniform = 0usize;
    let mut total = 0usize;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = gray.get_pixel(x as u32, y as u32)[0];
            let bits = RING.map(|(dx, dy)| gray.get_pixel((x + dx) as u32, (y + dy) as u32)[0] >= center);
            let transitions = (0..8).filter(|&i| bits[i] != bits[(i + 1) % 8]).count();
            if transitions <= 2 {
                uniform += 1;
            }
            total += 1;
        }
    }
    Some(uniform as f64 / total as f64)
}

pub fn shape_features(edge_map: &EdgeMap) -> ShapeFeatures {
    let components = edges::connected_components(edge_map);

    let mut shape_types: BTreeMap<ShapeKind, usize> = BTreeMap::new();
    for component in components
        .iter()
        .take(ANALYZED_CONTOURS)
        .filter(|c| c.len() > MIN_CONTOUR_PIXELS)
    {
        let hull = edges::convex_hull(component);
        let epsilon = 0.02 * edges::perimeter(&hull);
        let kind = ShapeKind::from_vertex_count(edges::approximate_vertex_count(&hull, epsilon));
        *shape_types.entry(kind).or_default() += 1;
    }

    ShapeFeatures {
        contour_count: components.len(),
        edge_strength: edge_map.density() * 255.0,
        shape_types,
        geometric_complexity: Complexity::from_thresholds(components.len() as f64, 5.0, 20.0),
    }
}

pub fn composition_features(image: &RgbImage) -> Option<CompositionFeatures> {
    let (width, height) = (image.width(), image.height());
    let (third_w, third_h) = (width / 3, height / 3);
    if third_w == 0 || third_h == 0 {
        return None;
    }

    let region = |x0: u32, x1: u32, y0: u32, y1: u32| -> Option<f64> {
        let values = (y0..y1).flat_map(|y| {
            (x0..x1).flat_map(move |x| image.get_pixel(x, y).0.map(f64::from))
        });
        mean_std(values).map(|(mean, _)| mean)
    };

    let region_brightness = RegionBrightness {
        top_left: region(0, third_w, 0, third_h)?,
        top_center: region(third_w, 2 * third_w, 0, third_h)?,
        top_right: region(2 * third_w, width, 0, third_h)?,
        center: region(third_w, 2 * third_w, third_h, 2 * third_h)?,
        bottom: region(0, width, 2 * third_h, height)?,
    };
    let (_, spread) = mean_std(region_brightness.values().into_iter())?;
    let balance_score = 1.0 - spread / 255.0;
    let composition_quality = if balance_score > 0.7 {
        Rating::Good
    } else if balance_score > 0.5 {
        Rating::Fair
    } else {
        Rating::Poor
    };

    Some(CompositionFeatures {
        region_brightness,
        balance_score,
        composition_quality,
        aspect_ratio: width as f64 / height as f64,
    })
}

pub fn quality_features(gray: &GrayImage) -> Option<QualityFeatures> {
    let (width, height) = (gray.width(), gray.height());
    if width < 3 || height < 3 {
        return None;
    }

    let px = |x: u32, y: u32| gray.get_pixel(x, y)[0] as f64;
    let laplacian = (1..height - 1).flat_map(|y| {
        (1..width - 1).map(move |x| {
            px(x - 1, y) + px(x + 1, y) + px(x, y - 1) + px(x, y + 1) - 4.0 * px(x, y)
        })
    });
    let (_, laplacian_std) = mean_std(laplacian)?;
    let sharpness = laplacian_std * laplacian_std;
    let (brightness, contrast) = mean_std(gray.pixels().map(|p| p[0] as f64))?;

    let quality_score = (sharpness / 1000.0 * 40.0
        + brightness.min(255.0 - brightness) / 127.5 * 30.0
        + contrast / 127.5 * 30.0)
        .min(100.0);
    let quality_rating = if quality_score > 80.0 {
        Rating::Excellent
    } else if quality_score > 60.0 {
        Rating::Good
    } else if quality_score > 40.0 {
        Rating::Fair
    } else {
        Rating::Poor
    };

    Some(QualityFeatures {
        sharpness,
        brightness,
        contrast,
        quality_score,
        quality_rating,
    })
}

/// Population mean and standard deviation; `None` for an empty sequence
fn mean_std(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (mut count, mut mean, mut m2) = (0usize, 0.0f64, 0.0f64);
    for value in values {
        count += 1;
        let delta = value - mean;
        mean += delta / count as f64;
        m2 += delta * (value - mean);
    }
    (count > 0).then(|| (mean, (m2 / count as f64).sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_mean_std() {
        let (mean, std) = mean_std([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter()).unwrap();
        assert!((mean - 5.0).abs() < 1e-9);
        assert!((std - 2.0).abs() < 1e-9);
        assert!(mean_std(std::iter::empty()).is_none());
    }

    #[test]
    fn test_flat_texture_is_fully_uniform() {
        let gray = GrayImage::from_pixel(10, 10, Luma([90]));
        let texture = texture_features(&gray, &edges::canny(&gray, 50.0, 150.0)).unwrap();
        assert_eq!(texture.uniformity, 1.0);
        assert_eq!(texture.contrast, 0.0);
        assert_eq!(texture.complexity, Complexity::Low);
    }

    #[test]
    fn test_checkerboard_is_complex_and_non_uniform() {
        let gray = GrayImage::from_fn(30, 30, |x, y| {
            if (x + y) % 2 == 0 { Luma([255]) } else { Luma([0]) }
        });
        assert!(lbp_uniformity(&gray).unwrap() < 0.6);
        let quality = quality_features(&gray).unwrap();
        assert!(quality.sharpness > 1000.0);
        assert!((quality.contrast - 127.5).abs() < 1e-6);
    }

    #[test]
    fn test_half_dark_image_is_unbalanced() {
        let image = RgbImage::from_fn(90, 90, |_, y| {
            if y < 60 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
        });
        let composition = composition_features(&image).unwrap();
        assert_eq!(composition.region_brightness.top_left, 255.0);
        assert_eq!(composition.region_brightness.bottom, 0.0);
        assert!(composition.balance_score < 0.7);
        assert_ne!(composition.composition_quality, Rating::Good);
    }

    #[test]
    fn test_square_outline_counts_one_rectangle() {
        let gray = GrayImage::from_fn(100, 100, |x, y| {
            if (20..80).contains(&x) && (20..80).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        let shapes = shape_features(&edges::canny(&gray, 50.0, 150.0));
        assert_eq!(shapes.contour_count, 1);
        assert_eq!(shapes.shape_types.get(&ShapeKind::Rectangle), Some(&1));
        assert_eq!(shapes.geometric_complexity, Complexity::Low);
        assert!(shapes.edge_strength > 0.0);
    }

    #[test]
    fn test_mid_gray_quality_score() {
        let gray = GrayImage::from_pixel(20, 20, Luma([128]));
        let quality = quality_features(&gray).unwrap();
        // 127/127.5 * 30 from brightness centering alone
        assert!((quality.quality_score - 29.88).abs() < 0.01);
        assert_eq!(quality.quality_rating, Rating::Poor);
    }
}
