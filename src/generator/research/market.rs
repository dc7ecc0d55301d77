use tracing::info;

use super::MarketResearcher;
use crate::generator::context::GeneratorContext;
use crate::generator::prompt::{NOT_SPECIFIED, PromptTemplate, demographic_line, join_or, product_line};
use crate::types::{BusinessConcept, CompetitionLevel, MarketInsights, Score};

const TRENDS_FALLBACK: &str = "Unable to determine current trends";
const MARKET_SIZE_FALLBACK: &str = "Market size unknown";
const TARGET_MARKET_FALLBACK: &str = "Target market analysis unavailable";
const SCORE_REPLY: &str = "Provide only a numerical score (0-100).";

impl MarketResearcher {
    /// Derive market insights for a concept.
    ///
    /// Every sub-analysis falls back on its own; the narrative runs last because it is
    /// built from the two scores and the trend list.
    pub async fn analyze_market(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
    ) -> MarketInsights {
        info!(
            location = concept.target_demographics.location(),
            "analyzing market"
        );

        let (
            demographic_fit,
            location_demand,
            trends,
            competition_level,
            market_size,
            seasonal_factors,
            regulatory_considerations,
        ) = futures::join!(
            self.demographic_fit(context, concept),
            self.location_demand(context, concept),
            self.market_trends(context, concept),
            self.competition_level(context, concept),
            self.market_size(context, concept),
            self.seasonal_factors(context, concept),
            self.regulatory_considerations(context, concept),
        );

        let target_market_analysis = self
            .target_market_analysis(context, concept, demographic_fit, location_demand, &trends)
            .await;

        MarketInsights {
            market_size,
            competition_level,
            trends,
            seasonal_factors,
            regulatory_considerations,
            target_market_analysis,
            demographic_fit_score: Score::new(demographic_fit),
            location_demand_score: Score::new(location_demand),
        }
    }

    async fn demographic_fit(&self, context: &GeneratorContext, concept: &BusinessConcept) -> f64 {
        let demographics = &concept.target_demographics;
        let prompt = PromptTemplate::new(
            "Analyze how well this business concept fits the target demographics:",
        )
        .context("Business Concept", &concept.concept_description)
        .context("Product", product_line(concept))
        .context("Target Demographics", "")
        .context("- Age", demographics.age_band())
        .context("- Income", demographics.income_range().to_string())
        .context("- Location", demographics.location())
        .context("- Interests", join_or(demographics.interests(), usize::MAX, NOT_SPECIFIED))
        .context("- Gender", demographics.gender().unwrap_or(NOT_SPECIFIED))
        .context(
            "- Education",
            demographics.education_level().unwrap_or(NOT_SPECIFIED),
        )
        .criteria(
            "Rate the demographic fit on a scale of 0-100, considering:",
            &[
                "Age appropriateness of the product/service",
                "Income level alignment with pricing expectations",
                "Interest alignment with the concept",
                "Geographic relevance",
                "Lifestyle compatibility",
            ],
        )
        .closing(SCORE_REPLY);

        context.prompt_score("demographic_fit", &prompt, 50).await
    }

    async fn location_demand(&self, context: &GeneratorContext, concept: &BusinessConcept) -> f64 {
        let location = concept.target_demographics.location();
        let prompt = PromptTemplate::new(format!(
            "Analyze the market demand for this business concept in {}:",
            location
        ))
        .context("Business Concept", &concept.concept_description)
        .context("Product/Service", product_line(concept))
        .context("Target Location", location)
        .criteria(
            "Consider:",
            &[
                "Local market conditions and economy",
                "Population density and demographics",
                "Competition saturation in the area",
                "Local preferences and culture",
                "Infrastructure and accessibility",
                "Regulatory environment",
            ],
        )
        .closing(format!(
            "Rate the location demand on a scale of 0-100.\n{}",
            SCORE_REPLY
        ));

        context.prompt_score("location_demand", &prompt, 50).await
    }

    async fn market_trends(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
    ) -> Vec<String> {
        let category = concept
            .product_info
            .category()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "General".to_string());
        let prompt = PromptTemplate::new(
            "Identify current market trends relevant to this business concept:",
        )
        .context("Business Concept", &concept.concept_description)
        .context("Product Category", category)
        .context("Target Demographics", demographic_line(concept))
        .criteria(
            "List 5-7 current market trends that could impact this business, including:",
            &[
                "Industry trends",
                "Consumer behavior trends",
                "Technology trends",
                "Economic trends",
                "Social trends",
            ],
        )
        .closing("Format as a simple list, one trend per line.");

        context
            .prompt_list("market_trends", &prompt, 300, 7, vec![TRENDS_FALLBACK.to_string()])
            .await
    }

    async fn competition_level(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
    ) -> CompetitionLevel {
        let prompt = PromptTemplate::new("Assess the competition level for this business concept:")
            .context("Business Concept", &concept.concept_description)
            .context("Product/Service", product_line(concept))
            .context("Target Market", concept.target_demographics.location())
            .criteria(
                "Consider:",
                &[
                    "Number of existing competitors",
                    "Market saturation",
                    "Barriers to entry",
                    "Brand loyalty in the market",
                    "Innovation rate in the industry",
                ],
            )
            .closing(
                "Classify competition level as one of: low, medium, high\nProvide only the classification word.",
            );

        let label = context
            .prompt_classification(
                "competition_level",
                &prompt,
                20,
                &CompetitionLevel::LABELS,
                "medium",
            )
            .await;
        label.parse().unwrap_or_default()
    }

    async fn market_size(&self, context: &GeneratorContext, concept: &BusinessConcept) -> String {
        let prompt = PromptTemplate::new("Estimate the market size for this business concept:")
            .context("Business Concept", &concept.concept_description)
            .context("Target Location", concept.target_demographics.location())
            .context("Target Demographics", demographic_line(concept))
            .criteria(
                "Provide a market size estimate considering:",
                &[
                    "Total addressable market (TAM)",
                    "Serviceable addressable market (SAM)",
                    "Local market potential",
                ],
            )
            .closing(
                "Format as a brief description (e.g., \"Small local market ($1M-5M)\", \"Large regional market ($50M+)\", etc.)",
            );

        context
            .prompt_text("market_size", &prompt, 100, MARKET_SIZE_FALLBACK)
            .await
    }

    async fn seasonal_factors(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
    ) -> Vec<String> {
        let prompt = PromptTemplate::new("Identify seasonal factors that could affect this business:")
            .context("Business Concept", &concept.concept_description)
            .context("Product/Service", product_line(concept))
            .context("Location", concept.target_demographics.location())
            .criteria(
                "Consider:",
                &[
                    "Seasonal demand patterns",
                    "Weather-related factors",
                    "Holiday and event impacts",
                    "School calendar effects",
                    "Economic cycles",
                ],
            )
            .closing("List 3-5 key seasonal factors, one per line.");

        context
            .prompt_list("seasonal_factors", &prompt, 200, 5, Vec::new())
            .await
    }

    async fn regulatory_considerations(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
    ) -> Vec<String> {
        let prompt = PromptTemplate::new("Identify regulatory considerations for this business:")
            .context("Business Concept", &concept.concept_description)
            .context("Product/Service", product_line(concept))
            .context("Location", concept.target_demographics.location())
            .criteria(
                "Consider:",
                &[
                    "Licensing requirements",
                    "Industry regulations",
                    "Safety standards",
                    "Tax implications",
                    "Zoning restrictions",
                    "Professional certifications needed",
                ],
            )
            .closing("List 3-5 key regulatory considerations, one per line.");

        context
            .prompt_list("regulatory_considerations", &prompt, 200, 5, Vec::new())
            .await
    }

    async fn target_market_analysis(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        demographic_fit: f64,
        location_demand: f64,
        trends: &[String],
    ) -> String {
        let prompt = PromptTemplate::new(
            "Provide a comprehensive target market analysis for this business concept:",
        )
        .context("Business Concept", &concept.concept_description)
        .context("Target Demographics", concept.audience_summary())
        .context("Demographic Fit Score", format!("{}/100", demographic_fit))
        .context("Location Demand Score", format!("{}/100", location_demand))
        .context("Key Market Trends", join_or(trends, 3, ""))
        .criteria(
            "Provide a 2-3 paragraph analysis covering:",
            &[
                "Target market characteristics and size",
                "Market opportunity and potential",
                "Key challenges and considerations",
                "Recommendations for market entry",
            ],
        );

        context
            .prompt_text("target_market_analysis", &prompt, 400, TARGET_MARKET_FALLBACK)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::{ScriptedClient, context_with, sample_concept};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_analyze_market_parses_every_sub_analysis() {
        let client = Arc::new(
            ScriptedClient::new()
                .reply("fits the target demographics", "Score: 82")
                .reply("market demand for this business", "About 140 out of 100")
                .reply("current market trends", "1. Remote work\n2. Specialty coffee\n- ok\n3. Local sourcing")
                .reply("competition level", "High.")
                .reply("market size", "  Small local market ($1M-5M)\n")
                .reply("seasonal factors", "- Winter demand spike\n- Summer iced drinks")
                .reply("regulatory considerations", "* Food handling permit")
                .reply("comprehensive target market analysis", "Strong fit overall."),
        );
        let context = context_with(client.clone());

        let insights = MarketResearcher
            .analyze_market(&context, &sample_concept())
            .await;

        assert_eq!(insights.demographic_fit_score.value(), 82.0);
        assert_eq!(insights.location_demand_score.value(), 100.0);
        assert_eq!(
            insights.trends,
            vec!["Remote work", "Specialty coffee", "Local sourcing"]
        );
        assert_eq!(insights.competition_level, CompetitionLevel::High);
        assert_eq!(insights.market_size, "Small local market ($1M-5M)");
        assert_eq!(insights.seasonal_factors.len(), 2);
        assert_eq!(insights.regulatory_considerations, vec!["Food handling permit"]);
        assert_eq!(insights.target_market_analysis, "Strong fit overall.");

        let narrative_prompt = client
            .prompts()
            .into_iter()
            .find(|p| p.contains("comprehensive target market analysis"))
            .unwrap();
        assert!(narrative_prompt.contains("Demographic Fit Score: 82/100"));
        assert!(narrative_prompt.contains("Key Market Trends: Remote work, Specialty coffee, Local sourcing"));
    }

    #[tokio::test]
    async fn test_failed_calls_use_documented_defaults() {
        let context = context_with(Arc::new(ScriptedClient::new()));

        let insights = MarketResearcher
            .analyze_market(&context, &sample_concept())
            .await;

        assert_eq!(insights.demographic_fit_score.value(), 50.0);
        assert_eq!(insights.location_demand_score.value(), 50.0);
        assert_eq!(insights.trends, vec![TRENDS_FALLBACK]);
        assert_eq!(insights.competition_level, CompetitionLevel::Medium);
        assert_eq!(insights.market_size, MARKET_SIZE_FALLBACK);
        assert!(insights.seasonal_factors.is_empty());
        assert!(insights.regulatory_considerations.is_empty());
        assert_eq!(insights.target_market_analysis, TARGET_MARKET_FALLBACK);
    }

    #[tokio::test]
    async fn test_unexpected_classification_defaults_to_medium() {
        let client = Arc::new(
            ScriptedClient::new()
                .reply("competition level", "moderate")
                .otherwise("60"),
        );
        let insights = MarketResearcher
            .analyze_market(&context_with(client), &sample_concept())
            .await;
        assert_eq!(insights.competition_level, CompetitionLevel::Medium);
    }

    #[tokio::test]
    async fn test_list_cap_respects_configured_limit() {
        let client = Arc::new(
            ScriptedClient::new()
                .reply("current market trends", "Trend one\nTrend two\nTrend three\nTrend four")
                .otherwise("60"),
        );
        let mut context = context_with(client);
        context.config.research.max_search_results = 2;

        let insights = MarketResearcher
            .analyze_market(&context, &sample_concept())
            .await;
        assert_eq!(insights.trends, vec!["Trend one", "Trend two"]);
    }
}
