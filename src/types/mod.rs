pub mod business;
pub mod evaluation;
pub mod image;

pub use business::{
    BusinessCategory, BusinessConcept, Demographics, IncomeRange, ProductImage, ProductInfo,
};
pub use evaluation::{
    BrandingRecommendations, CompetitionLevel, CompetitiveAnalysis, CoreScores,
    EvaluationResult, ExecutiveSummary, FinancialProjections, MarketInsights, RiskAssessment,
    Score, WebsiteCopy,
};
pub use image::{AiImageAnalysis, ImageAnalysis, ImageFeatures};
