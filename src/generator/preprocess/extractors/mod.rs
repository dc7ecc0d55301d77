//! Deterministic visual feature extraction for product images

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GrayImage, RgbImage};
use tracing::{debug, warn};

use crate::error::{EvaluationError, Result};
use crate::types::image::{
    ColorFeatures, CompositionFeatures, ImageFeatures, QualityFeatures, TextureFeatures,
};

mod analysis;
mod clustering;
pub mod edges;

const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;
const JPEG_QUALITY: u8 = 85;

/// Decodes, downscales and measures product images
#[derive(Debug, Clone, Copy)]
pub struct ImageFeatureExtractor {
    max_dimension: u32,
}

impl Default for ImageFeatureExtractor {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl ImageFeatureExtractor {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    /// Decode to RGB and shrink so the longer side fits the configured bound
    pub fn prepare(&self, data: &[u8]) -> Result<RgbImage> {
        let decoded =
            image::load_from_memory(data).map_err(|e| EvaluationError::Image(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(EvaluationError::Image("image has no pixels".to_string()));
        }

        let decoded = if width.max(height) > self.max_dimension {
            debug!(width, height, max = self.max_dimension, "downscaling product image");
            decoded.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3)
        } else {
            decoded
        };
        Ok(decoded.to_rgb8())
    }

    /// Re-encode a prepared image for the vision model
    pub fn encode_jpeg(&self, image: &RgbImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
            .encode_image(image)
            .map_err(|e| EvaluationError::Image(e.to_string()))?;
        Ok(buffer)
    }

    /// Decode and measure raw image bytes
    pub fn extract(&self, data: &[u8]) -> Result<ImageFeatures> {
        let image = self.prepare(data)?;
        Ok(self.measure(&image))
    }

    /// Measure a prepared image. Each group falls back to its neutral default on its own.
    pub fn measure(&self, image: &RgbImage) -> ImageFeatures {
        let gray: GrayImage = image::imageops::grayscale(image);
        let edge_map = edges::canny(&gray, CANNY_LOW, CANNY_HIGH);

        ImageFeatures {
            width: image.width(),
            height: image.height(),
            colors: or_neutral("colors", analysis::color_features(image), ColorFeatures::default),
            texture: or_neutral(
                "texture",
                analysis::texture_features(&gray, &edge_map),
                TextureFeatures::default,
            ),
            shapes: analysis::shape_features(&edge_map),
            composition: or_neutral(
                "composition",
                analysis::composition_features(image),
                CompositionFeatures::default,
            ),
            quality: or_neutral(
                "quality",
                analysis::quality_features(&gray),
                QualityFeatures::default,
            ),
        }
    }
}

fn or_neutral<T>(group: &str, value: Option<T>, neutral: impl FnOnce() -> T) -> T {
    value.unwrap_or_else(|| {
        warn!(group, "image too small for feature group, using neutral values");
        neutral()
    })
}
