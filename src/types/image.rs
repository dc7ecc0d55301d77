use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Three-level grade used for texture and geometric complexity
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn from_thresholds(value: f64, medium: f64, high: f64) -> Self {
        if value > high {
            Complexity::High
        } else if value > medium {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}

/// Quality grade used for overall image quality and composition
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Excellent,
    Good,
    #[default]
    Fair,
    Poor,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Excellent => write!(f, "excellent"),
            Rating::Good => write!(f, "good"),
            Rating::Fair => write!(f, "fair"),
            Rating::Poor => write!(f, "poor"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Triangle,
    Rectangle,
    Circle,
    Polygon,
}

impl ShapeKind {
    /// Classify an approximated contour by its vertex count.
    pub fn from_vertex_count(vertices: usize) -> Self {
        match vertices {
            3 => ShapeKind::Triangle,
            4 => ShapeKind::Rectangle,
            n if n > 8 => ShapeKind::Circle,
            _ => ShapeKind::Polygon,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColorFeatures {
    /// Cluster centers, largest cluster first
    pub dominant_colors: Vec<[u8; 3]>,
    pub average_color: [f64; 3],
    pub color_variance: [f64; 3],
    /// Mean of the per-channel variances
    pub color_diversity: f64,
}

impl Default for ColorFeatures {
    fn default() -> Self {
        Self {
            dominant_colors: Vec::new(),
            average_color: [128.0; 3],
            color_variance: [0.0; 3],
            color_diversity: 0.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TextureFeatures {
    pub uniformity: f64,
    pub edge_density: f64,
    pub contrast: f64,
    pub complexity: Complexity,
}

impl Default for TextureFeatures {
    fn default() -> Self {
        Self {
            uniformity: 0.5,
            edge_density: 0.0,
            contrast: 0.0,
            complexity: Complexity::Low,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ShapeFeatures {
    pub contour_count: usize,
    pub edge_strength: f64,
    pub shape_types: BTreeMap<ShapeKind, usize>,
    pub geometric_complexity: Complexity,
}

/// Mean brightness of the five rule-of-thirds regions
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct RegionBrightness {
    pub top_left: f64,
    pub top_center: f64,
    pub top_right: f64,
    pub center: f64,
    pub bottom: f64,
}

impl RegionBrightness {
    pub fn values(&self) -> [f64; 5] {
        [
            self.top_left,
            self.top_center,
            self.top_right,
            self.center,
            self.bottom,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompositionFeatures {
    pub region_brightness: RegionBrightness,
    pub balance_score: f64,
    pub composition_quality: Rating,
    pub aspect_ratio: f64,
}

impl Default for CompositionFeatures {
    fn default() -> Self {
        Self {
            region_brightness: RegionBrightness::default(),
            balance_score: 0.5,
            composition_quality: Rating::Fair,
            aspect_ratio: 1.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QualityFeatures {
    pub sharpness: f64,
    pub brightness: f64,
    pub contrast: f64,
    /// 0-100
    pub quality_score: f64,
    pub quality_rating: Rating,
}

impl Default for QualityFeatures {
    fn default() -> Self {
        Self {
            sharpness: 0.0,
            brightness: 127.5,
            contrast: 0.0,
            quality_score: 50.0,
            quality_rating: Rating::Fair,
        }
    }
}

/// Deterministic visual features of one product image
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ImageFeatures {
    pub width: u32,
    pub height: u32,
    pub colors: ColorFeatures,
    pub texture: TextureFeatures,
    pub shapes: ShapeFeatures,
    pub composition: CompositionFeatures,
    pub quality: QualityFeatures,
}

/// Structured reading of the vision model's product critique
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AiImageAnalysis {
    pub product_category: String,
    /// 1-10
    pub visual_appeal_score: u8,
    pub design_quality: String,
    pub target_audience: String,
    pub market_positioning: String,
    pub raw_analysis: String,
}

impl Default for AiImageAnalysis {
    fn default() -> Self {
        Self {
            product_category: "Unknown".to_string(),
            visual_appeal_score: 5,
            design_quality: "Fair".to_string(),
            target_audience: "General".to_string(),
            market_positioning: "Standard".to_string(),
            raw_analysis: String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ImageAnalysis {
    pub features: ImageFeatures,
    pub ai_analysis: AiImageAnalysis,
    pub recommendations: Vec<String>,
}
