use tracing::{error, info, warn};

use super::Assessor;
use crate::generator::context::GeneratorContext;
use crate::generator::parsing::{extract_list, parse_sections};
use crate::generator::prompt::{PromptTemplate, join_or};
use crate::types::{
    BusinessConcept, CompetitiveAnalysis, CoreScores, ExecutiveSummary, MarketInsights,
};

const SUMMARY: &str = "EXECUTIVE SUMMARY";
const RECOMMENDATIONS: &str = "RECOMMENDATIONS";
const NEXT_STEPS: &str = "NEXT STEPS";

const MAX_ITEMS: usize = 7;

pub const DEFAULT_RECOMMENDATIONS: [&str; 5] = [
    "Conduct detailed market research",
    "Develop minimum viable product",
    "Test with target audience",
    "Secure initial funding",
    "Build strong team",
];

pub const DEFAULT_NEXT_STEPS: [&str; 5] = [
    "Validate product-market fit",
    "Create business plan",
    "Develop prototype",
    "Identify key partnerships",
    "Plan go-to-market strategy",
];

impl Assessor {
    pub async fn summarize(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        scores: &CoreScores,
        insights: &MarketInsights,
        competition: &CompetitiveAnalysis,
    ) -> ExecutiveSummary {
        info!("generating executive summary");

        let prompt = PromptTemplate::new(
            "Create an executive summary and recommendations for this business evaluation:",
        )
        .context("Business Concept", &concept.concept_description)
        .context(
            "Overall Success Score",
            format!("{}/100", scores.overall_success_score),
        )
        .context(
            "Market Demand Score",
            format!("{}/100", scores.market_demand_score),
        )
        .context("Competition Level", insights.competition_level.to_string())
        .context("Target Demographics", concept.audience_summary())
        .context(
            "Differentiation Opportunities",
            join_or(&competition.differentiation_opportunities, 3, "None identified"),
        )
        .criteria(
            "Provide:",
            &[
                "A concise executive summary (2-3 paragraphs)",
                "5-7 key recommendations",
                "5-7 immediate next steps",
            ],
        )
        .closing(
            "Format as:\nEXECUTIVE SUMMARY:\n[summary]\nRECOMMENDATIONS:\n- [recommendation]\nNEXT STEPS:\n- [step]",
        );

        match context.generate(&prompt.render(), 600).await {
            Ok(reply) => summary_from_reply(&reply, context.list_cap(MAX_ITEMS)),
            Err(e) => {
                error!(error = %e, "summary generation failed");
                ExecutiveSummary::unavailable()
            }
        }
    }
}

fn summary_from_reply(reply: &str, max_items: usize) -> ExecutiveSummary {
    let sections = parse_sections(reply, &[SUMMARY, RECOMMENDATIONS, NEXT_STEPS]);

    let summary = sections
        .get(SUMMARY)
        .map(|body| body.trim().to_string())
        .filter(|body| !body.is_empty())
        .or_else(|| first_paragraph(reply))
        .unwrap_or_else(|| ExecutiveSummary::unavailable().summary);

    let list = |header: &str, defaults: &[&str]| {
        let items = sections
            .get(header)
            .map(|body| extract_list(body, max_items).value)
            .unwrap_or_default();
        if items.is_empty() {
            warn!(section = header, "summary section missing, using default list");
            defaults.iter().map(|d| d.to_string()).collect()
        } else {
            items
        }
    };

    ExecutiveSummary {
        summary,
        recommendations: list(RECOMMENDATIONS, &DEFAULT_RECOMMENDATIONS),
        next_steps: list(NEXT_STEPS, &DEFAULT_NEXT_STEPS),
    }
}

fn first_paragraph(text: &str) -> Option<String> {
    text.split("\n\n")
        .map(str::trim)
        .find(|paragraph| !paragraph.is_empty())
        .map(str::to_string)
}
