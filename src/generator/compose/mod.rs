//! Branding stage: positioning, messaging, visual identity and collateral copy

use tracing::info;

use crate::generator::context::GeneratorContext;
use crate::generator::prompt::{NOT_SPECIFIED, PromptTemplate, demographic_line, join_or, product_line};
use crate::types::{BrandingRecommendations, BusinessConcept, ImageAnalysis, MarketInsights};

pub mod palette;
mod website;

pub use palette::generate_color_palette;

/// Issues the branding prompts for one concept
#[derive(Default)]
pub struct BrandingGenerator;

impl BrandingGenerator {
    pub async fn generate_branding_recommendations(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
        image_analysis: Option<&ImageAnalysis>,
    ) -> BrandingRecommendations {
        info!("generating branding recommendations");

        let (
            brand_positioning,
            key_messaging,
            visual_identity_suggestions,
            marketing_channels,
            content_strategy,
            logo_concepts,
        ) = futures::join!(
            self.brand_positioning(context, concept, insights),
            self.key_messaging(context, concept),
            self.visual_identity(context, concept, image_analysis),
            self.marketing_channels(context, concept, insights),
            self.content_strategy(context, concept, insights),
            self.logo_concepts(context, concept),
        );

        let commercial_script = self
            .commercial_script(context, concept, &brand_positioning)
            .await;

        BrandingRecommendations {
            brand_positioning,
            key_messaging,
            visual_identity_suggestions,
            marketing_channels,
            content_strategy,
            logo_concepts,
            color_palette: generate_color_palette(concept.product_info.category()),
            commercial_script: Some(commercial_script),
        }
    }

    async fn brand_positioning(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
    ) -> String {
        let prompt =
            PromptTemplate::new("Create a brand positioning statement for this business concept:")
                .context("Business Concept", &concept.concept_description)
                .context("Product/Service", product_line(concept))
                .context("Target Demographics", concept.audience_summary())
                .context("Competition Level", insights.competition_level.to_string())
                .context("Key Market Trends", join_or(&insights.trends, 3, ""))
                .criteria(
                    "Create a clear, compelling brand positioning statement that:",
                    &[
                        "Defines the target audience",
                        "Identifies the category/market",
                        "States the unique value proposition",
                        "Differentiates from competitors",
                    ],
                )
                .closing("Format as a concise positioning statement (2-3 sentences).");

        context
            .prompt_text(
                "brand_positioning",
                &prompt,
                200,
                "Brand positioning statement unavailable",
            )
            .await
    }

    async fn key_messaging(&self, context: &GeneratorContext, concept: &BusinessConcept) -> Vec<String> {
        let prompt = PromptTemplate::new("Generate key marketing messages for this business concept:")
            .context("Business Concept", &concept.concept_description)
            .context(
                "Product Features",
                join_or(concept.product_info.features(), usize::MAX, NOT_SPECIFIED),
            )
            .context(
                "Competitive Advantages",
                join_or(&concept.competitive_advantages, usize::MAX, NOT_SPECIFIED),
            )
            .context("Target Audience", demographic_line(concept))
            .criteria(
                "Create 5-7 key marketing messages that:",
                &[
                    "Highlight unique benefits",
                    "Address customer pain points",
                    "Emphasize value proposition",
                    "Resonate with target audience",
                    "Differentiate from competitors",
                ],
            )
            .closing("Format as short, punchy messages, one per line.");

        context
            .prompt_list(
                "key_messaging",
                &prompt,
                300,
                7,
                vec!["Key messaging unavailable".to_string()],
            )
            .await
    }

    async fn visual_identity(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        image_analysis: Option<&ImageAnalysis>,
    ) -> Vec<String> {
        let category = concept
            .product_info
            .category()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "General".to_string());
        let product_analysis = image_analysis
            .map(|a| a.ai_analysis.design_quality.clone())
            .unwrap_or_else(|| "Not available".to_string());

        let prompt =
            PromptTemplate::new("Generate visual identity suggestions for this business concept:")
                .context("Business Concept", &concept.concept_description)
                .context("Product Category", category)
                .context("Target Demographics", demographic_line(concept))
                .context("Product Analysis", product_analysis)
                .criteria(
                    "Suggest visual identity elements including:",
                    &[
                        "Overall design style (modern, classic, minimalist, etc.)",
                        "Typography recommendations",
                        "Imagery style",
                        "Visual tone and mood",
                        "Brand personality expression",
                    ],
                )
                .closing("Format as specific suggestions, one per line.");

        context
            .prompt_list(
                "visual_identity",
                &prompt,
                250,
                6,
                vec!["Visual identity suggestions unavailable".to_string()],
            )
            .await
    }

    async fn marketing_channels(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
    ) -> Vec<String> {
        let interests = concept.target_demographics.interests();
        let prompt = PromptTemplate::new("Recommend marketing channels for this business concept:")
            .context("Business Concept", &concept.concept_description)
            .context("Target Demographics", concept.audience_summary())
            .context("Target Interests", join_or(interests, usize::MAX, NOT_SPECIFIED))
            .context("Market Size", &insights.market_size)
            .context("Competition Level", insights.competition_level.to_string())
            .criteria(
                "Recommend 5-7 marketing channels considering:",
                &[
                    "Target audience preferences",
                    "Budget efficiency",
                    "Market reach potential",
                    "Competition level",
                    "Local vs. digital opportunities",
                ],
            )
            .closing("Format as specific channels, one per line.");

        context
            .prompt_list(
                "marketing_channels",
                &prompt,
                200,
                7,
                vec!["Marketing channel recommendations unavailable".to_string()],
            )
            .await
    }

    async fn content_strategy(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
    ) -> String {
        let interests = concept.target_demographics.interests();
        let prompt =
            PromptTemplate::new("Create a content marketing strategy for this business concept:")
                .context("Business Concept", &concept.concept_description)
                .context("Target Demographics", demographic_line(concept))
                .context("Target Interests", join_or(interests, usize::MAX, NOT_SPECIFIED))
                .context("Market Trends", join_or(&insights.trends, 3, ""))
                .criteria(
                    "Provide a content strategy covering:",
                    &[
                        "Content themes and topics",
                        "Content formats and types",
                        "Publishing frequency and schedule",
                        "Audience engagement approach",
                        "Content distribution strategy",
                    ],
                )
                .closing("Format as a comprehensive strategy (2-3 paragraphs).");

        context
            .prompt_text("content_strategy", &prompt, 400, "Content strategy unavailable")
            .await
    }

    async fn logo_concepts(&self, context: &GeneratorContext, concept: &BusinessConcept) -> Vec<String> {
        let prompt = PromptTemplate::new("Generate logo concept ideas for this business:")
            .context("Business Concept", &concept.concept_description)
            .context("Product/Service", product_line(concept))
            .context(
                "Business Name",
                concept.product_info.name().unwrap_or(NOT_SPECIFIED),
            )
            .criteria(
                "Create 5-6 logo concept ideas that:",
                &[
                    "Reflect the business nature",
                    "Appeal to target audience",
                    "Are memorable and distinctive",
                    "Work across different media",
                    "Convey brand personality",
                ],
            )
            .closing("Format as concept descriptions, one per line.");

        context
            .prompt_list(
                "logo_concepts",
                &prompt,
                250,
                6,
                vec!["Logo concept ideas unavailable".to_string()],
            )
            .await
    }

    async fn commercial_script(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        brand_positioning: &str,
    ) -> String {
        let prompt = PromptTemplate::new("Create a 30-second commercial script for this business:")
            .context("Business Concept", &concept.concept_description)
            .context("Product/Service", product_line(concept))
            .context("Brand Positioning", brand_positioning)
            .context("Target Audience", demographic_line(concept))
            .criteria(
                "Create an engaging 30-second commercial script that:",
                &[
                    "Grabs attention in the first 5 seconds",
                    "Clearly communicates the value proposition",
                    "Includes a strong call to action",
                    "Resonates with the target audience",
                    "Reflects the brand positioning",
                ],
            )
            .closing("Format as a proper script with scene descriptions and dialogue.");

        context
            .prompt_text("commercial_script", &prompt, 400, "Commercial script unavailable")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::{ScriptedClient, context_with, sample_concept};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_branding_collects_every_section() {
        let client = Arc::new(
            ScriptedClient::new()
                .reply("30-second commercial script", "SCENE 1: A sleepy commuter.")
                .reply("brand positioning statement", "The neighborhood roaster, delivered.")
                .reply("key marketing messages", "1. Fresh every week\n2. Meet your roaster")
                .reply("visual identity suggestions", "- Warm earthy tones")
                .reply("marketing channels", "Instagram\nLocal farmers markets")
                .reply("content marketing strategy", "Share roaster stories weekly.")
                .reply("logo concept ideas", "A coffee bean shaped like a box"),
        );
        let context = context_with(client.clone());

        let branding = BrandingGenerator
            .generate_branding_recommendations(
                &context,
                &sample_concept(),
                &MarketInsights::default(),
                None,
            )
            .await;

        assert_eq!(branding.brand_positioning, "The neighborhood roaster, delivered.");
        assert_eq!(branding.key_messaging, vec!["Fresh every week", "Meet your roaster"]);
        assert_eq!(branding.visual_identity_suggestions, vec!["Warm earthy tones"]);
        assert_eq!(branding.marketing_channels.len(), 2);
        assert_eq!(branding.content_strategy, "Share roaster stories weekly.");
        assert_eq!(branding.logo_concepts.len(), 1);
        assert_eq!(branding.commercial_script.as_deref(), Some("SCENE 1: A sleepy commuter."));
        assert_eq!(branding.color_palette[0], "#E67E22");

        let script_prompt = client
            .prompts()
            .into_iter()
            .find(|p| p.contains("30-second commercial script"))
            .unwrap();
        assert!(script_prompt.contains("Brand Positioning: The neighborhood roaster, delivered."));
    }

    #[tokio::test]
    async fn test_failed_calls_use_placeholders() {
        let context = context_with(Arc::new(ScriptedClient::new()));

        let branding = BrandingGenerator
            .generate_branding_recommendations(
                &context,
                &sample_concept(),
                &MarketInsights::default(),
                None,
            )
            .await;

        assert_eq!(branding.brand_positioning, "Brand positioning statement unavailable");
        assert_eq!(branding.key_messaging, vec!["Key messaging unavailable"]);
        assert_eq!(branding.content_strategy, "Content strategy unavailable");
        assert_eq!(
            branding.commercial_script.as_deref(),
            Some("Commercial script unavailable")
        );
        assert!((3..=8).contains(&branding.color_palette.len()));
    }
}
