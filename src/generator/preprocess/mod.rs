//! Input normalization ahead of prompting

use tracing::info;

use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::types::{BusinessConcept, Demographics, ProductInfo};
use crate::utils::text::{clean_list, clean_text, normalize_interests, standardize_location};

pub mod extractors;
pub mod image_validation;

pub use image_validation::validate_image;

/// Cleans every free-text field of a concept and drops product images that fail validation.
///
/// The returned concept is rebuilt through the validating constructors, so a concept whose
/// description cleans down to nothing and whose image is rejected fails here.
pub async fn normalize_concept(
    concept: &BusinessConcept,
    config: &ProcessingConfig,
) -> Result<BusinessConcept> {
    info!("normalizing business concept input");

    let target_demographics = normalize_demographics(&concept.target_demographics)?;
    let product_info = normalize_product(&concept.product_info, config).await?;

    Ok(BusinessConcept {
        concept_description: clean_text(&concept.concept_description),
        target_demographics,
        product_info,
        business_model: concept.business_model.as_deref().map(clean_text),
        competitive_advantages: clean_list(&concept.competitive_advantages),
        funding_requirements: concept.funding_requirements.as_deref().map(clean_text),
        timeline: concept.timeline.as_deref().map(clean_text),
    })
}

fn normalize_demographics(demographics: &Demographics) -> Result<Demographics> {
    let location = standardize_location(&clean_text(demographics.location()));

    Ok(Demographics::new(
        demographics.age_min(),
        demographics.age_max(),
        demographics.income_range(),
        location,
    )?
    .with_interests(normalize_interests(demographics.interests()))
    .with_gender(demographics.gender().map(|g| clean_text(&g.to_lowercase())))
    .with_education_level(demographics.education_level().map(clean_text))
    .with_lifestyle(demographics.lifestyle().map(clean_text)))
}

async fn normalize_product(product: &ProductInfo, config: &ProcessingConfig) -> Result<ProductInfo> {
    let image = match product.image() {
        Some(image) => validate_image(image, config).await,
        None => None,
    };

    ProductInfo::builder()
        .name(product.name().map(clean_text))
        .description(product.description().map(clean_text))
        .image(image)
        .category(product.category())
        .price_range(product.price_range().map(clean_text))
        .features(clean_list(product.features()))
        .build()
}
