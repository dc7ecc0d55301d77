//! Category color palettes and complementary color derivation

use crate::types::BusinessCategory;

const MAX_PALETTE_SIZE: usize = 8;

const DEFAULT_PALETTE: [&str; 5] = ["#3498DB", "#E74C3C", "#2ECC71", "#F39C12", "#9B59B6"];

/// Five-color base palette for a category
pub fn base_palette(category: Option<BusinessCategory>) -> [&'static str; 5] {
    match category {
        Some(BusinessCategory::Technology) => {
            ["#007ACC", "#4A90E2", "#50C878", "#FF6B35", "#2E3440"]
        }
        Some(BusinessCategory::Retail) => ["#E74C3C", "#F39C12", "#27AE60", "#8E44AD", "#34495E"],
        Some(BusinessCategory::FoodBeverage) => {
            ["#E67E22", "#C0392B", "#F1C40F", "#27AE60", "#8B4513"]
        }
        Some(BusinessCategory::HealthFitness) => {
            ["#2ECC71", "#3498DB", "#E74C3C", "#F39C12", "#95A5A6"]
        }
        Some(BusinessCategory::Education) => {
            ["#3498DB", "#9B59B6", "#E67E22", "#1ABC9C", "#34495E"]
        }
        Some(BusinessCategory::Entertainment) => {
            ["#E91E63", "#9C27B0", "#FF5722", "#FFC107", "#607D8B"]
        }
        Some(BusinessCategory::Finance) => ["#2C3E50", "#34495E", "#1ABC9C", "#3498DB", "#95A5A6"],
        Some(BusinessCategory::ProfessionalServices) => {
            ["#34495E", "#2C3E50", "#3498DB", "#1ABC9C", "#95A5A6"]
        }
        _ => DEFAULT_PALETTE,
    }
}

/// Base palette followed by the complements of its first two colors, at most 8 entries.
///
/// Hex strings are uppercase `#RRGGBB`; duplicates are compared case-insensitively.
pub fn generate_color_palette(category: Option<BusinessCategory>) -> Vec<String> {
    let base = base_palette(category);
    let mut palette: Vec<String> = base.iter().map(|c| c.to_string()).collect();

    for color in base.iter().take(2) {
        let Some(rgb) = parse_hex(color) else {
            continue;
        };
        let candidate = to_hex(complement(rgb));
        if !palette.iter().any(|c| c.eq_ignore_ascii_case(&candidate)) {
            palette.push(candidate);
        }
    }

    palette.truncate(MAX_PALETTE_SIZE);
    palette
}

/// Complementary color: hue shifted by 180 degrees, saturation and value preserved
pub fn complement(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f64 / 255.0);
    let (h, s, v) = rgb_to_hsv(r, g, b);
    let (r, g, b) = hsv_to_rgb(rotate_hue(h, 180.0), s, v);
    [r, g, b].map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Rotate a hue in [0, 1) by the given number of degrees
pub fn rotate_hue(hue: f64, degrees: f64) -> f64 {
    (hue + degrees / 360.0).rem_euclid(1.0)
}

/// RGB in [0, 1] to (hue, saturation, value), each in [0, 1]
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return (0.0, 0.0, v);
    }

    let delta = max - min;
    let s = delta / max;
    let h = if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    ((h / 6.0).rem_euclid(1.0), s, v)
}

pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }

    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex_color(color: &str) -> bool {
        color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn test_technology_palette_starts_with_base() {
        let palette = generate_color_palette(Some(BusinessCategory::Technology));

        assert_eq!(&palette[..5], &base_palette(Some(BusinessCategory::Technology)));
        assert!(palette.len() <= 8);
        assert!(palette.iter().all(|c| is_hex_color(c)));
        assert_eq!(palette[5], "#CC5200");
    }

    #[test]
    fn test_unknown_category_uses_default_palette() {
        let palette = generate_color_palette(Some(BusinessCategory::Travel));
        assert_eq!(&palette[..5], &DEFAULT_PALETTE);

        let palette = generate_color_palette(None);
        assert_eq!(&palette[..5], &DEFAULT_PALETTE);
    }

    #[test]
    fn test_palette_is_deterministic() {
        for category in [
            None,
            Some(BusinessCategory::Retail),
            Some(BusinessCategory::Finance),
        ] {
            assert_eq!(generate_color_palette(category), generate_color_palette(category));
        }
    }

    #[test]
    fn test_no_duplicate_colors() {
        for category in [
            Some(BusinessCategory::Education),
            Some(BusinessCategory::HealthFitness),
            Some(BusinessCategory::ProfessionalServices),
        ] {
            let palette = generate_color_palette(category);
            let mut upper: Vec<String> = palette.iter().map(|c| c.to_uppercase()).collect();
            upper.sort();
            upper.dedup();
            assert_eq!(upper.len(), palette.len());
        }
    }

    #[test]
    fn test_hue_rotation_round_trip() {
        for hue in [0.0, 0.1, 0.25, 0.5, 0.567, 0.99] {
            let back = rotate_hue(rotate_hue(hue, 180.0), 180.0);
            assert!((back - hue).abs() < 1e-9, "{} -> {}", hue, back);
        }
    }

    #[test]
    fn test_hsv_round_trip() {
        let (h, s, v) = rgb_to_hsv(0.2, 0.4, 0.6);
        let (r, g, b) = hsv_to_rgb(h, s, v);
        assert!((r - 0.2).abs() < 1e-9);
        assert!((g - 0.4).abs() < 1e-9);
        assert!((b - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_grey_complement_is_itself() {
        assert_eq!(complement([128, 128, 128]), [128, 128, 128]);
        assert_eq!(parse_hex("#zz0000"), None);
    }
}
