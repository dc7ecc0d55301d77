use tracing::{error, info};

use super::BrandingGenerator;
use crate::generator::context::GeneratorContext;
use crate::generator::parsing::parse_sections;
use crate::generator::prompt::{PromptTemplate, join_or};
use crate::types::{BrandingRecommendations, BusinessConcept, WebsiteCopy};

const SECTIONS: [&str; 4] = ["HERO", "ABOUT", "SERVICES", "CTA"];

impl BrandingGenerator {
    /// Landing page copy from the branding output; sections missing from the reply keep
    /// the stock copy.
    pub async fn generate_website_copy(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        branding: &BrandingRecommendations,
    ) -> WebsiteCopy {
        info!("generating website copy");

        let prompt = PromptTemplate::new("Generate website copy for this business:")
            .context("Business Concept", &concept.concept_description)
            .context("Brand Positioning", &branding.brand_positioning)
            .context("Key Messages", join_or(&branding.key_messaging, 3, ""))
            .criteria(
                "Create copy for:",
                &[
                    "Hero headline (compelling, benefit-focused)",
                    "About section (2-3 sentences)",
                    "Services/Products section (brief description)",
                    "Call-to-action text",
                ],
            )
            .closing(
                "Format as:\nHERO: [headline]\nABOUT: [about text]\nSERVICES: [services text]\nCTA: [call-to-action]",
            );

        match context.generate(&prompt.render(), 300).await {
            Ok(reply) => website_copy_from_reply(&reply),
            Err(e) => {
                error!(error = %e, "website copy generation failed, using stock copy");
                WebsiteCopy::default()
            }
        }
    }
}

fn website_copy_from_reply(reply: &str) -> WebsiteCopy {
    let mut sections = parse_sections(reply, &SECTIONS);
    let mut take = |header: &str, fallback: String| {
        sections
            .remove(header)
            .filter(|text| !text.is_empty())
            .unwrap_or(fallback)
    };

    let stock = WebsiteCopy::default();
    WebsiteCopy {
        hero: take("HERO", stock.hero),
        about: take("ABOUT", stock.about),
        services: take("SERVICES", stock.services),
        cta: take("CTA", stock.cta),
    }
}
