//! End-to-end evaluation of one business concept

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{EvaluationError, Result};
use crate::generator::assessment::Assessor;
use crate::generator::compose::BrandingGenerator;
use crate::generator::context::GeneratorContext;
use crate::generator::preprocess::normalize_concept;
use crate::generator::research::MarketResearcher;
use crate::generator::scoring::ScoreCalculator;
use crate::generator::vision::ImageAnalyzer;
use crate::llm::GenerationClient;
use crate::types::evaluation::MODEL_VERSION;
use crate::types::{
    BrandingRecommendations, BusinessConcept, EvaluationResult, FinancialProjections, WebsiteCopy,
};

/// Wall-clock durations of the stages of one run, in execution order
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: Vec<(&'static str, Instant)>,
    phase_durations: Vec<(&'static str, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    pub fn start_phase(&mut self, phase: &'static str) {
        self.phase_start_times.push((phase, Instant::now()));
    }

    pub fn end_phase(&mut self, phase: &'static str) -> Option<Duration> {
        let index = self.phase_start_times.iter().position(|(p, _)| *p == phase)?;
        let (_, started) = self.phase_start_times.remove(index);
        let duration = started.elapsed();
        self.phase_durations.push((phase, duration));
        Some(duration)
    }

    pub fn total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn phase_durations(&self) -> &[(&'static str, Duration)] {
        &self.phase_durations
    }

    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "Total evaluation time: {:.2}s\n",
            self.total_duration().as_secs_f64()
        );
        if !self.phase_durations.is_empty() {
            report.push_str("\nStage durations:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}s\n", phase, duration.as_secs_f64()));
            }
        }
        report
    }
}

/// Stage names used in timing reports
pub struct TimingKeys;

impl TimingKeys {
    pub const NORMALIZE: &'static str = "normalize";
    pub const IMAGE_ANALYSIS: &'static str = "image_analysis";
    pub const MARKET_RESEARCH: &'static str = "market_research";
    pub const SCORING: &'static str = "score_calculation";
    pub const BRANDING: &'static str = "branding";
    pub const COMPETITION: &'static str = "competitive_analysis";
    pub const FINANCIAL: &'static str = "financial_projection";
    pub const RISK: &'static str = "risk_assessment";
    pub const SUMMARY: &'static str = "summary_generation";
}

/// Optional stages of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOptions {
    pub include_branding: bool,
    pub include_financial: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            include_branding: true,
            include_financial: true,
        }
    }
}

/// Sequences the evaluation stages over one shared generation context
pub struct EvaluationOrchestrator {
    context: GeneratorContext,
    image_analyzer: ImageAnalyzer,
    market_researcher: MarketResearcher,
    score_calculator: ScoreCalculator,
    branding_generator: BrandingGenerator,
    assessor: Assessor,
}

impl EvaluationOrchestrator {
    pub fn new(client: Arc<dyn GenerationClient>, config: Config) -> Self {
        Self::from_context(GeneratorContext::new(client, config))
    }

    pub fn from_context(context: GeneratorContext) -> Self {
        Self {
            context,
            image_analyzer: ImageAnalyzer,
            market_researcher: MarketResearcher,
            score_calculator: ScoreCalculator,
            branding_generator: BrandingGenerator,
            assessor: Assessor,
        }
    }

    pub fn context(&self) -> &GeneratorContext {
        &self.context
    }

    /// Run every stage for one concept.
    ///
    /// Only an unavailable generation backend or input rejected during normalization fails
    /// the run; every later stage substitutes its fallback and the run continues.
    pub async fn evaluate_business_concept(
        &self,
        concept: &BusinessConcept,
        options: EvaluationOptions,
    ) -> Result<EvaluationResult> {
        let context = &self.context;
        if !context.client.is_available() {
            error!("no generation backend configured");
            return Err(EvaluationError::ServiceUnavailable(
                "no generation backend configured".to_string(),
            ));
        }

        let preview: String = concept.concept_description.chars().take(100).collect();
        info!(concept = %preview, "starting business concept evaluation");
        let mut timing = TimingScope::new();

        timing.start_phase(TimingKeys::NORMALIZE);
        let concept = normalize_concept(concept, &context.config.processing).await?;
        timing.end_phase(TimingKeys::NORMALIZE);

        let image_analysis = if concept.product_info.has_image() {
            timing.start_phase(TimingKeys::IMAGE_ANALYSIS);
            let analysis = match self
                .image_analyzer
                .analyze_product_image(context, &concept.product_info)
                .await
            {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    warn!(error = %e, "product image analysis failed, continuing without it");
                    None
                }
            };
            timing.end_phase(TimingKeys::IMAGE_ANALYSIS);
            analysis
        } else {
            None
        };

        timing.start_phase(TimingKeys::MARKET_RESEARCH);
        let market_insights = self.market_researcher.analyze_market(context, &concept).await;
        timing.end_phase(TimingKeys::MARKET_RESEARCH);

        timing.start_phase(TimingKeys::SCORING);
        let scores = self
            .score_calculator
            .calculate_scores(context, &concept, &market_insights, image_analysis.as_ref())
            .await;
        timing.end_phase(TimingKeys::SCORING);

        let branding_recommendations = if options.include_branding {
            timing.start_phase(TimingKeys::BRANDING);
            let branding = self
                .branding_generator
                .generate_branding_recommendations(
                    context,
                    &concept,
                    &market_insights,
                    image_analysis.as_ref(),
                )
                .await;
            timing.end_phase(TimingKeys::BRANDING);
            branding
        } else {
            BrandingRecommendations::not_generated()
        };

        timing.start_phase(TimingKeys::COMPETITION);
        let competitive_analysis = self
            .market_researcher
            .analyze_competition(context, &concept, &market_insights)
            .await;
        timing.end_phase(TimingKeys::COMPETITION);

        let financial_projections = if options.include_financial {
            timing.start_phase(TimingKeys::FINANCIAL);
            let projections = self
                .assessor
                .project_financials(context, &concept, &market_insights, &scores)
                .await;
            timing.end_phase(TimingKeys::FINANCIAL);
            projections
        } else {
            FinancialProjections::default()
        };

        timing.start_phase(TimingKeys::RISK);
        let risk_assessment = self
            .assessor
            .assess_risks(context, &concept, &market_insights, &scores)
            .await;
        timing.end_phase(TimingKeys::RISK);

        timing.start_phase(TimingKeys::SUMMARY);
        let summary = self
            .assessor
            .summarize(context, &concept, &scores, &market_insights, &competitive_analysis)
            .await;
        timing.end_phase(TimingKeys::SUMMARY);

        info!(
            overall = %scores.overall_success_score,
            elapsed_secs = timing.total_duration().as_secs_f64(),
            "evaluation completed"
        );
        debug!("{}", timing.generate_timing_report());

        Ok(EvaluationResult {
            business_concept: concept,
            scores,
            market_insights,
            branding_recommendations,
            competitive_analysis,
            financial_projections,
            risk_assessment,
            image_analysis,
            executive_summary: summary.summary,
            recommendations: summary.recommendations,
            next_steps: summary.next_steps,
            evaluation_date: chrono::Utc::now(),
            model_version: MODEL_VERSION.to_string(),
        })
    }

    /// Landing page copy for a finished evaluation
    pub async fn generate_website_copy(&self, result: &EvaluationResult) -> WebsiteCopy {
        self.branding_generator
            .generate_website_copy(
                &self.context,
                &result.business_concept,
                &result.branding_recommendations,
            )
            .await
    }
}
