//! Product image analysis: measured features plus a vision model critique

use regex::Regex;
use std::sync::LazyLock;
use tracing::{error, info};

use crate::error::{EvaluationError, Result};
use crate::generator::context::GeneratorContext;
use crate::generator::preprocess::extractors::ImageFeatureExtractor;
use crate::generator::prompt::PromptTemplate;
use crate::types::image::Rating;
use crate::types::{AiImageAnalysis, ImageAnalysis, ImageFeatures, ProductImage, ProductInfo};

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

const MAX_RECOMMENDATIONS: usize = 5;

const GENERIC_RECOMMENDATIONS: [&str; 3] = [
    "Ensure the product is the main focus of the image",
    "Use consistent lighting and background across product images",
    "Consider multiple angles or lifestyle shots to showcase the product",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Category,
    Appeal,
    Quality,
    Audience,
    Strengths,
    Weaknesses,
    Positioning,
    Branding,
}

const SECTION_KEYWORDS: [(&str, Section); 8] = [
    ("product category", Section::Category),
    ("visual appeal", Section::Appeal),
    ("design quality", Section::Quality),
    ("target audience", Section::Audience),
    ("strengths", Section::Strengths),
    ("weaknesses", Section::Weaknesses),
    ("market positioning", Section::Positioning),
    ("branding", Section::Branding),
];

/// Runs the image half of an evaluation
#[derive(Default)]
pub struct ImageAnalyzer;

impl ImageAnalyzer {
    /// Measure the product image and ask the vision model about it.
    ///
    /// Fails only when the image cannot be loaded or decoded; a failed vision call leaves the
    /// critique at its neutral defaults.
    pub async fn analyze_product_image(
        &self,
        context: &GeneratorContext,
        product: &ProductInfo,
    ) -> Result<ImageAnalysis> {
        info!("starting product image analysis");

        let data = match product.image() {
            Some(ProductImage::Bytes(data)) => data.clone(),
            Some(ProductImage::Path(path)) => tokio::fs::read(path).await.map_err(|e| {
                EvaluationError::Image(format!("failed to read {}: {}", path.display(), e))
            })?,
            None => return Err(EvaluationError::Image("no product image".to_string())),
        };

        let extractor = ImageFeatureExtractor::new(context.config.processing.max_image_dimension);
        let (features, jpeg) = tokio::task::spawn_blocking(move || -> Result<_> {
            let image = extractor.prepare(&data)?;
            Ok((extractor.measure(&image), extractor.encode_jpeg(&image)?))
        })
        .await
        .map_err(|e| EvaluationError::Image(e.to_string()))??;

        let prompt = vision_prompt(product).render();
        let ai_analysis = match context
            .client
            .analyze_image(&jpeg, &prompt, Some(context.config.llm.vision_model.as_str()))
            .await
        {
            Ok(reply) => parse_vision_reply(&reply),
            Err(e) => {
                error!(error = %e, "vision analysis failed, using neutral critique");
                AiImageAnalysis::default()
            }
        };

        let recommendations = image_recommendations(&features, &ai_analysis);
        info!(
            quality = features.quality.quality_score,
            appeal = ai_analysis.visual_appeal_score,
            "product image analysis completed"
        );

        Ok(ImageAnalysis {
            features,
            ai_analysis,
            recommendations,
        })
    }
}

fn vision_prompt(product: &ProductInfo) -> PromptTemplate {
    let features = if product.features().is_empty() {
        "None listed".to_string()
    } else {
        product.features().join(", ")
    };

    PromptTemplate::new("Analyze this product image and provide detailed insights:")
        .context("Product Context", "")
        .context("- Name", product.name().unwrap_or("Unknown"))
        .context("- Description", product.description_or("Not provided"))
        .context("- Features", features)
        .criteria(
            "Please analyze and provide:",
            &[
                "Product Category: What type of product is this?",
                "Visual Appeal: Rate the visual appeal (1-10) and explain",
                "Design Quality: Assess the design quality and professionalism",
                "Target Audience: Who would this product appeal to?",
                "Strengths: What are the visual strengths?",
                "Weaknesses: What could be improved visually?",
                "Market Positioning: How would you position this product?",
                "Branding Suggestions: What branding approach would work?",
            ],
        )
        .closing("Provide specific, actionable insights based on what you see in the image.")
}

/// Read the critique line by line; a keyword in a line's label opens that section and the
/// text after the first colon becomes its value.
pub fn parse_vision_reply(reply: &str) -> AiImageAnalysis {
    let mut analysis = AiImageAnalysis {
        raw_analysis: reply.to_string(),
        ..Default::default()
    };

    let mut section = None;
    for line in reply.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (label, content) = match line.split_once(':') {
            Some((label, content)) => (label, Some(content.trim())),
            None => (line, None),
        };
        let label = label.to_lowercase();
        if let Some((_, found)) = SECTION_KEYWORDS.iter().find(|(kw, _)| label.contains(kw)) {
            section = Some(*found);
        }

        let (Some(current), Some(content)) = (section, content) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }
        match current {
            Section::Category => analysis.product_category = content.to_string(),
            Section::Appeal => {
                if let Some(score) = INTEGER
                    .find(content)
                    .and_then(|m| m.as_str().parse::<u64>().ok())
                {
                    analysis.visual_appeal_score = score.clamp(1, 10) as u8;
                }
            }
            Section::Quality => analysis.design_quality = content.to_string(),
            Section::Audience => analysis.target_audience = content.to_string(),
            Section::Positioning => analysis.market_positioning = content.to_string(),
            Section::Strengths | Section::Weaknesses | Section::Branding => {}
        }
    }
    analysis
}

/// Targeted fixes first, then the generic advice, five at most
pub fn image_recommendations(features: &ImageFeatures, ai: &AiImageAnalysis) -> Vec<String> {
    let mut recommendations = Vec::new();

    if features.quality.quality_score < 60.0 {
        recommendations.push("Consider using a higher quality image with better lighting and focus");
    }
    if features.colors.color_diversity < 1000.0 {
        recommendations.push("Add more visual interest with varied colors or textures");
    }
    if features.composition.composition_quality == Rating::Poor {
        recommendations.push("Improve image composition by following the rule of thirds");
    }
    if ai.visual_appeal_score < 6 {
        recommendations.push("Enhance visual appeal through better styling or presentation");
    }
    recommendations.extend(GENERIC_RECOMMENDATIONS);

    recommendations
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}
