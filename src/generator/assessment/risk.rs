use std::collections::BTreeMap;
use tracing::{error, info, warn};

use super::Assessor;
use crate::generator::context::GeneratorContext;
use crate::generator::parsing::{extract_list, parse_sections};
use crate::generator::prompt::{PromptTemplate, join_or};
use crate::types::{BusinessConcept, CoreScores, MarketInsights, RiskAssessment};

const HIGH: &str = "HIGH RISKS";
const MEDIUM: &str = "MEDIUM RISKS";
const LOW: &str = "LOW RISKS";
const MITIGATION: &str = "MITIGATION";
const SUCCESS_FACTORS: &str = "SUCCESS FACTORS";

const MAX_ITEMS: usize = 7;

impl Assessor {
    /// Risks by priority with mitigations; an empty assessment when the call fails
    pub async fn assess_risks(
        &self,
        context: &GeneratorContext,
        concept: &BusinessConcept,
        insights: &MarketInsights,
        scores: &CoreScores,
    ) -> RiskAssessment {
        info!("assessing business risks");

        let prompt = PromptTemplate::new("Analyze the risks for this business concept:")
            .context("Concept", &concept.concept_description)
            .context("Market Competition", insights.competition_level.to_string())
            .context("Target Market", concept.target_demographics.location())
            .context(
                "Execution Difficulty Score",
                format!("{}/100", scores.execution_difficulty_score),
            )
            .context(
                "Regulatory Considerations",
                join_or(&insights.regulatory_considerations, 3, "None identified"),
            )
            .criteria(
                "Identify and categorize:",
                &[
                    "High priority risks",
                    "Medium priority risks",
                    "Low priority risks",
                    "Mitigation strategies for the most serious risks",
                    "Critical success factors",
                ],
            )
            .closing(
                "Format as:\nHIGH RISKS:\n- [risk]\nMEDIUM RISKS:\n- [risk]\nLOW RISKS:\n- [risk]\nMITIGATION:\n- [risk]: [strategy]\nSUCCESS FACTORS:\n- [factor]",
            );

        match context.generate(&prompt.render(), 500).await {
            Ok(reply) => {
                let assessment = assessment_from_reply(&reply, context.list_cap(MAX_ITEMS));
                if assessment == RiskAssessment::default() {
                    warn!("risk reply had no recognizable sections");
                }
                assessment
            }
            Err(e) => {
                error!(error = %e, "risk assessment failed, leaving assessment empty");
                RiskAssessment::default()
            }
        }
    }
}

fn assessment_from_reply(reply: &str, max_items: usize) -> RiskAssessment {
    let sections = parse_sections(reply, &[HIGH, MEDIUM, LOW, MITIGATION, SUCCESS_FACTORS]);
    let list = |header: &str| {
        sections
            .get(header)
            .map(|body| extract_list(body, max_items).value)
            .unwrap_or_default()
    };

    let mitigation_strategies: BTreeMap<String, String> = list(MITIGATION)
        .into_iter()
        .filter_map(|line| {
            let (risk, strategy) = line.split_once(':')?;
            let (risk, strategy) = (risk.trim(), strategy.trim());
            (!risk.is_empty() && !strategy.is_empty())
                .then(|| (risk.to_string(), strategy.to_string()))
        })
        .collect();

    RiskAssessment {
        high_risks: list(HIGH),
        medium_risks: list(MEDIUM),
        low_risks: list(LOW),
        mitigation_strategies,
        success_factors: list(SUCCESS_FACTORS),
    }
}
