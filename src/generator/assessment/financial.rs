use std::collections::BTreeMap;
use tracing::{error, info, warn};

use super::{Assessor, split_inline_list};
use crate::generator::context::GeneratorContext;
use crate::generator::parsing::parse_sections;
use crate::generator::prompt::{NOT_SPECIFIED, PromptTemplate};
use crate::types::{BusinessConcept, CoreScores, FinancialProjections, MarketInsights};

const STARTUP: &str = "STARTUP COSTS";
const YEARS: [&str; 3] = ["YEAR 1", "YEAR 2", "YEAR 3"];
const BREAK_EVEN: &str = "BREAK-EVEN";
const FUNDING: &str = "FUNDING";
const COSTS: &str = "COSTS";

impl Assessor {
    /// Rough three-year outlook; empty projections when the call fails
    pub async fn project_financials(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
        scores: &CoreScores,
    ) -> FinancialProjections {
        info!("generating financial projections");

        let prompt = PromptTemplate::new("Create financial projections for this business concept:")
            .context("Business Concept", &concept.concept_description)
            .context(
                "Business Model",
                concept.business_model.as_deref().unwrap_or(NOT_SPECIFIED),
            )
            .context(
                "Funding Requirements",
                concept.funding_requirements.as_deref().unwrap_or(NOT_SPECIFIED),
            )
            .context("Target Demographics", concept.audience_summary())
            .context("Market Size", &insights.market_size)
            .context("Competition Level", insights.competition_level.to_string())
            .context(
                "Overall Success Score",
                format!("{}/100", scores.overall_success_score),
            )
            .criteria(
                "Estimate:",
                &[
                    "Startup cost range",
                    "Revenue range for each of the first three years",
                    "Break-even timeline",
                    "Suitable funding options",
                    "Key cost drivers",
                ],
            )
            .closing(
                "Format as:\nStartup Costs: [range]\nYear 1: [revenue range]\nYear 2: [revenue range]\nYear 3: [revenue range]\nBreak-even: [timeline]\nFunding: [option; option; option]\nCosts: [driver; driver; driver]",
            );

        match context.generate(&prompt.render(), 400).await {
            Ok(reply) => {
                let projections = projections_from_reply(&reply);
                if projections.is_empty() {
                    warn!("financial reply had no recognizable lines");
                }
                projections
            }
            Err(e) => {
                error!(error = %e, "financial projection failed, leaving projections empty");
                FinancialProjections::default()
            }
        }
    }
}

fn projections_from_reply(reply: &str) -> FinancialProjections {
    let mut headers = vec![STARTUP, BREAK_EVEN, FUNDING, COSTS];
    headers.extend(YEARS);
    let sections = parse_sections(reply, &headers);
    let text = |header: &str| {
        sections
            .get(header)
            .map(|body| body.trim().to_string())
            .filter(|body| !body.is_empty())
    };

    let revenue_projections: BTreeMap<String, String> = YEARS
        .into_iter()
        .enumerate()
        .filter_map(|(i, header)| text(header).map(|range| (format!("Year {}", i + 1), range)))
        .collect();

    FinancialProjections {
        startup_costs: text(STARTUP),
        revenue_projections,
        break_even_timeline: text(BREAK_EVEN),
        funding_requirements: text(FUNDING)
            .map(|t| split_inline_list(&t))
            .unwrap_or_default(),
        key_cost_drivers: text(COSTS).map(|t| split_inline_list(&t)).unwrap_or_default(),
    }
}
