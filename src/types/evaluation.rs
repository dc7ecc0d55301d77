use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::business::BusinessConcept;
use crate::types::image::ImageAnalysis;

pub const MODEL_VERSION: &str = "1.0.0";

/// A 0-100 score. Out-of-range values are clamped on construction and deserialization.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;
    pub const NEUTRAL: Score = Score(50.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::NEUTRAL;
        }
        Score(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Coarse market crowdedness
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl CompetitionLevel {
    pub const LABELS: [&'static str; 3] = ["low", "medium", "high"];
}

impl std::fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionLevel::Low => write!(f, "low"),
            CompetitionLevel::Medium => write!(f, "medium"),
            CompetitionLevel::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for CompetitionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(CompetitionLevel::Low),
            "medium" => Ok(CompetitionLevel::Medium),
            "high" => Ok(CompetitionLevel::High),
            _ => Err(format!("Unknown competition level: {}", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MarketInsights {
    pub market_size: String,
    pub competition_level: CompetitionLevel,
    pub trends: Vec<String>,
    pub seasonal_factors: Vec<String>,
    pub regulatory_considerations: Vec<String>,
    pub target_market_analysis: String,
    pub demographic_fit_score: Score,
    pub location_demand_score: Score,
}

impl Default for MarketInsights {
    fn default() -> Self {
        Self {
            market_size: "Market size unknown".to_string(),
            competition_level: CompetitionLevel::Medium,
            trends: vec!["Unable to determine current trends".to_string()],
            seasonal_factors: Vec::new(),
            regulatory_considerations: Vec::new(),
            target_market_analysis: "Target market analysis unavailable".to_string(),
            demographic_fit_score: Score::NEUTRAL,
            location_demand_score: Score::NEUTRAL,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BrandingRecommendations {
    pub brand_positioning: String,
    pub key_messaging: Vec<String>,
    pub visual_identity_suggestions: Vec<String>,
    pub marketing_channels: Vec<String>,
    pub content_strategy: String,
    pub logo_concepts: Vec<String>,
    pub color_palette: Vec<String>,
    pub commercial_script: Option<String>,
}

impl BrandingRecommendations {
    /// Placeholder used when branding was not requested.
    pub fn not_generated() -> Self {
        Self {
            brand_positioning: "Not generated".to_string(),
            content_strategy: "Not generated".to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CompetitiveAnalysis {
    pub direct_competitors: Vec<String>,
    pub indirect_competitors: Vec<String>,
    pub competitive_advantages: Vec<String>,
    pub market_gaps: Vec<String>,
    pub differentiation_opportunities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct FinancialProjections {
    pub startup_costs: Option<String>,
    /// Keyed "year_1", "year_2", "year_3"
    pub revenue_projections: BTreeMap<String, String>,
    pub break_even_timeline: Option<String>,
    pub funding_requirements: Vec<String>,
    pub key_cost_drivers: Vec<String>,
}

impl FinancialProjections {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RiskAssessment {
    pub high_risks: Vec<String>,
    pub medium_risks: Vec<String>,
    pub low_risks: Vec<String>,
    /// risk -> mitigation strategy
    pub mitigation_strategies: BTreeMap<String, String>,
    pub success_factors: Vec<String>,
}

/// The headline scores from the consolidated scoring call.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CoreScores {
    pub market_demand_score: Score,
    pub concept_viability_score: Score,
    pub execution_difficulty_score: Score,
    pub overall_success_score: Score,
    pub confidence_level: Score,
}

impl CoreScores {
    /// Scores reported when the scoring call itself fails.
    pub fn fallback() -> Self {
        Self {
            market_demand_score: Score::NEUTRAL,
            concept_viability_score: Score::NEUTRAL,
            execution_difficulty_score: Score::NEUTRAL,
            overall_success_score: Score::NEUTRAL,
            confidence_level: Score::new(25.0),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ExecutiveSummary {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

impl ExecutiveSummary {
    pub fn unavailable() -> Self {
        Self {
            summary: "Summary not available".to_string(),
            ..Default::default()
        }
    }
}

/// Landing page copy blocks
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WebsiteCopy {
    pub hero: String,
    pub about: String,
    pub services: String,
    pub cta: String,
}

impl Default for WebsiteCopy {
    fn default() -> Self {
        Self {
            hero: "Transform Your Business Today".to_string(),
            about: "We provide innovative solutions for modern businesses.".to_string(),
            services: "Our comprehensive services are designed to meet your needs.".to_string(),
            cta: "Get Started Now".to_string(),
        }
    }
}

/// Terminal aggregate of one evaluation run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvaluationResult {
    pub business_concept: BusinessConcept,
    #[serde(flatten)]
    pub scores: CoreScores,
    pub market_insights: MarketInsights,
    pub branding_recommendations: BrandingRecommendations,
    pub competitive_analysis: CompetitiveAnalysis,
    pub financial_projections: FinancialProjections,
    pub risk_assessment: RiskAssessment,
    pub image_analysis: Option<ImageAnalysis>,
    pub executive_summary: String,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    pub evaluation_date: DateTime<Utc>,
    pub model_version: String,
}

impl EvaluationResult {
    pub fn market_demand_score(&self) -> f64 {
        self.scores.market_demand_score.value()
    }

    pub fn concept_viability_score(&self) -> f64 {
        self.scores.concept_viability_score.value()
    }

    pub fn execution_difficulty_score(&self) -> f64 {
        self.scores.execution_difficulty_score.value()
    }

    pub fn overall_success_score(&self) -> f64 {
        self.scores.overall_success_score.value()
    }

    pub fn confidence_level(&self) -> f64 {
        self.scores.confidence_level.value()
    }
}
