//! Consolidated headline scoring

use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::generator::context::GeneratorContext;
use crate::generator::parsing::parse_score_lines;
use crate::generator::prompt::{NOT_SPECIFIED, PromptTemplate, join_or};
use crate::types::{BusinessConcept, CoreScores, ImageAnalysis, MarketInsights, Score};

const MARKET_DEMAND: &str = "market_demand_score";
const CONCEPT_VIABILITY: &str = "concept_viability_score";
const EXECUTION_DIFFICULTY: &str = "execution_difficulty_score";
const OVERALL_SUCCESS: &str = "overall_success_score";
const CONFIDENCE: &str = "confidence_level";

/// Derives the four headline scores and a confidence level from one prompt
#[derive(Default)]
pub struct ScoreCalculator;

impl ScoreCalculator {
    pub async fn calculate_scores(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
        image_analysis: Option<&ImageAnalysis>,
    ) -> CoreScores {
        let prompt = self.build_prompt(concept, insights, image_analysis);

        match context.generate(&prompt.render(), context.config.llm.max_tokens).await {
            Ok(reply) => {
                let scores = scores_from_reply(&reply);
                info!(
                    overall = %scores.overall_success_score,
                    confidence = %scores.confidence_level,
                    "core scores calculated"
                );
                scores
            }
            Err(e) => {
                error!(error = %e, "score calculation failed, using fallback scores");
                CoreScores::fallback()
            }
        }
    }

    fn build_prompt(
        &self,
        concept: &BusinessConcept,
        insights: &MarketInsights,
        image_analysis: Option<&ImageAnalysis>,
    ) -> PromptTemplate {
        let demographics = &concept.target_demographics;
        let demographics_line = format!(
            "age range {}, income {}, location {}, interests [{}]",
            demographics.age_band(),
            demographics.income_range(),
            demographics.location(),
            demographics.interests().join(", ")
        );
        let market_line = format!(
            "competition level {}, demographic fit {}, location demand {}, trends [{}]",
            insights.competition_level,
            insights.demographic_fit_score,
            insights.location_demand_score,
            insights.trends.join("; ")
        );
        let mut product_line = format!(
            "description {}, features [{}]",
            concept.product_info.description_or(NOT_SPECIFIED),
            join_or(concept.product_info.features(), usize::MAX, "")
        );
        if let Some(analysis) = image_analysis {
            product_line.push_str(&format!(
                ", image analysis: category {}, visual appeal {}/10, image quality {:.0}/100",
                analysis.ai_analysis.product_category,
                analysis.ai_analysis.visual_appeal_score,
                analysis.features.quality.quality_score
            ));
        }

        PromptTemplate::new(
            "Analyze the following business concept and provide numerical scores (0-100) for each category:",
        )
        .context("Business Concept", &concept.concept_description)
        .context("Target Demographics", demographics_line)
        .context("Market Context", market_line)
        .context("Product Information", product_line)
        .criteria(
            "Please provide scores for:",
            &[
                "Market Demand Score (0-100): How much demand exists for this product/service",
                "Concept Viability Score (0-100): How viable and realistic the concept is",
                "Execution Difficulty Score (0-100): How difficult it would be to execute (higher = more difficult)",
                "Overall Success Score (0-100): Overall probability of business success",
            ],
        )
        .closing(
            "Consider factors like:\n\
             - Market size and growth potential\n\
             - Competition level and market saturation\n\
             - Target demographic alignment\n\
             - Product-market fit\n\
             - Execution complexity and resource requirements\n\
             - Geographic market conditions\n\
             - Current trends and timing\n\n\
             Respond with only the numerical scores in this format:\n\
             Market Demand Score: XX\n\
             Concept Viability Score: XX\n\
             Execution Difficulty Score: XX\n\
             Overall Success Score: XX\n\
             Confidence Level: XX",
        )
    }
}

/// Build scores from `Label: number` lines; missing labels score 50.
pub fn scores_from_reply(reply: &str) -> CoreScores {
    let parsed = parse_score_lines(reply);
    CoreScores {
        market_demand_score: required_score(&parsed, MARKET_DEMAND),
        concept_viability_score: required_score(&parsed, CONCEPT_VIABILITY),
        execution_difficulty_score: required_score(&parsed, EXECUTION_DIFFICULTY),
        overall_success_score: required_score(&parsed, OVERALL_SUCCESS),
        confidence_level: required_score(&parsed, CONFIDENCE),
    }
}

fn required_score(parsed: &HashMap<String, f64>, key: &str) -> Score {
    match parsed.get(key) {
        Some(&value) => {
            if !(Score::MIN..=Score::MAX).contains(&value) {
                warn!(key, value, "score out of range, clamping");
            }
            Score::new(value)
        }
        None => {
            warn!(key, "score missing from reply, using neutral score");
            Score::NEUTRAL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::{ScriptedClient, context_with, sample_concept};
    use std::sync::Arc;

    #[test]
    fn test_scores_from_reply_fills_and_clamps() {
        let scores = scores_from_reply(
            "Market Demand Score: 87\nConcept Viability Score: 42\nExecution Difficulty Score: 150\nOverall Success Score: -10\nnoise line",
        );
        assert_eq!(scores.market_demand_score.value(), 87.0);
        assert_eq!(scores.concept_viability_score.value(), 42.0);
        assert_eq!(scores.execution_difficulty_score.value(), 100.0);
        assert_eq!(scores.overall_success_score.value(), 0.0);
        assert_eq!(scores.confidence_level.value(), 50.0);
    }

    #[test]
    fn test_unparsable_values_are_ignored() {
        let scores = scores_from_reply("Market Demand Score: high\nConfidence Level: 70");
        assert_eq!(scores.market_demand_score.value(), 50.0);
        assert_eq!(scores.confidence_level.value(), 70.0);
    }

    #[tokio::test]
    async fn test_calculate_scores_prompt_and_reply() {
        let client = Arc::new(ScriptedClient::new().otherwise(
            "Market Demand Score: 70\nConcept Viability Score: 65\nExecution Difficulty Score: 40\nOverall Success Score: 68\nConfidence Level: 80",
        ));
        let context = context_with(client.clone());

        let scores = ScoreCalculator
            .calculate_scores(&context, &sample_concept(), &MarketInsights::default(), None)
            .await;

        assert_eq!(scores.overall_success_score.value(), 68.0);
        assert_eq!(scores.confidence_level.value(), 80.0);

        let prompt = &client.prompts()[0];
        assert!(prompt.contains("Business Concept: Coffee subscription for busy professionals"));
        assert!(prompt.contains("competition level medium"));
        assert!(prompt.contains("Overall Success Score: XX"));
    }

    #[tokio::test]
    async fn test_failed_call_returns_fallback_scores() {
        let context = context_with(Arc::new(ScriptedClient::new()));

        let scores = ScoreCalculator
            .calculate_scores(&context, &sample_concept(), &MarketInsights::default(), None)
            .await;

        assert_eq!(scores, CoreScores::fallback());
        assert_eq!(scores.confidence_level.value(), 25.0);
    }
}
