use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use flowco_rs::config::Config;
use flowco_rs::types::{
    BusinessCategory, BusinessConcept, CompetitionLevel, Demographics, IncomeRange, ProductImage,
    ProductInfo,
};
use flowco_rs::{
    EvaluationError, EvaluationOptions, EvaluationOrchestrator, EvaluationTask, GenerationClient,
    GenerationOptions, Result, TaskStatus,
};

/// Answers each prompt with the reply of the first matching needle
struct ScriptedBackend {
    rules: Vec<(&'static str, &'static str)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(rules: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            rules,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn answer(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle))
            .map(|(_, reply)| reply.to_string())
            .ok_or_else(|| EvaluationError::Generation("unscripted prompt".to_string()))
    }
}

#[async_trait]
impl GenerationClient for ScriptedBackend {
    async fn generate_text(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
        self.answer(prompt)
    }

    async fn analyze_image(&self, _image: &[u8], prompt: &str, _model: Option<&str>) -> Result<String> {
        self.answer(prompt)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn available_models(&self) -> Vec<String> {
        vec!["scripted".to_string()]
    }
}

/// Configured but every call times out
struct TimingOutBackend;

#[async_trait]
impl GenerationClient for TimingOutBackend {
    async fn generate_text(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        Err(EvaluationError::Timeout(45))
    }

    async fn analyze_image(&self, _image: &[u8], _prompt: &str, _model: Option<&str>) -> Result<String> {
        Err(EvaluationError::Timeout(45))
    }

    fn is_available(&self) -> bool {
        true
    }

    fn available_models(&self) -> Vec<String> {
        Vec::new()
    }
}

const RULES: [(&str, &str); 14] = [
    (
        "numerical scores (0-100)",
        "Market Demand Score: 85\nConcept Viability Score: 72\nExecution Difficulty Score: 140\nOverall Success Score: 68\nConfidence Level: 60",
    ),
    ("fits the target demographics", "81"),
    ("Analyze the market demand", "Demand looks strong, I'd say 70 out of 100"),
    ("Assess the competition level", "Low."),
    ("Identify current market trends", "1. Plant-based snacking\n2. Local sourcing"),
    ("Identify direct competitors", "- Crunchy Co\n- Snack Club"),
    ("Create a brand positioning statement", "The freshest snack box in Denver."),
    ("Generate key marketing messages", "- Snacks that do good\n- Fresh every week"),
    ("Analyze this product image", "1. Product Category: Snack box\n2. Visual Appeal: 4/10, cluttered\n3. Design Quality: Basic"),
    ("Create financial projections", "Startup Costs: $20,000\nYear 1: $80,000\nBreak-even: 18 months"),
    ("Analyze the risks", "HIGH RISKS:\n- Spoilage\nMITIGATION:\n- Spoilage: Smaller batches"),
    (
        "Create an executive summary",
        "EXECUTIVE SUMMARY:\nA viable local snack subscription.\nRECOMMENDATIONS:\n- Pilot in two neighborhoods\nNEXT STEPS:\n- Find a kitchen",
    ),
    ("Generate website copy", "HERO: Fresh snacks, weekly\nCTA: Build your box"),
    ("Identify market gaps", "- No organic option nearby"),
];

fn concept(product: ProductInfo) -> BusinessConcept {
    let demographics = Demographics::new(22, 35, IncomeRange::UpperMiddle, "  denver,   usa ")
        .unwrap()
        .with_interests(["Snacks", "health", "snacks"]);
    BusinessConcept::new("  Healthy   snack subscription  ", demographics, product)
        .with_business_model("Subscription")
}

fn described_product() -> ProductInfo {
    ProductInfo::builder()
        .name(Some("SnackDrop".to_string()))
        .description(Some("Weekly box of healthy local snacks".to_string()))
        .category(Some(BusinessCategory::FoodBeverage))
        .build()
        .unwrap()
}

fn write_product_png(dir: &TempDir) -> std::path::PathBuf {
    let image = RgbImage::from_fn(160, 120, |x, y| {
        if (40..120).contains(&x) && (30..90).contains(&y) {
            Rgb([200, 80, 40])
        } else {
            Rgb([245, 245, 240])
        }
    });
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();

    let path = dir.path().join("product.png");
    std::fs::write(&path, buffer.into_inner()).unwrap();
    path
}

#[tokio::test]
async fn test_full_evaluation_with_image() {
    let dir = TempDir::new().unwrap();
    let product = described_product().with_image(ProductImage::Path(write_product_png(&dir)));
    let backend = Arc::new(ScriptedBackend::new(RULES.to_vec()));
    let orchestrator = EvaluationOrchestrator::new(backend.clone(), Config::default());

    let result = orchestrator
        .evaluate_business_concept(&concept(product), EvaluationOptions::default())
        .await
        .unwrap();

    // normalized input is what the result carries
    assert_eq!(result.business_concept.concept_description, "Healthy snack subscription");
    assert_eq!(result.business_concept.target_demographics.location(), "Denver, USA");
    assert_eq!(result.business_concept.target_demographics.interests(), ["snacks", "health"]);

    assert_eq!(result.market_demand_score(), 85.0);
    assert_eq!(result.execution_difficulty_score(), 100.0);
    assert_eq!(result.market_insights.demographic_fit_score.value(), 81.0);
    assert_eq!(result.market_insights.location_demand_score.value(), 70.0);
    assert_eq!(result.market_insights.competition_level, CompetitionLevel::Low);
    assert_eq!(result.market_insights.trends, vec!["Plant-based snacking", "Local sourcing"]);
    assert_eq!(result.market_insights.market_size, "Market size unknown");
    assert_eq!(result.competitive_analysis.direct_competitors, vec!["Crunchy Co", "Snack Club"]);

    let analysis = result.image_analysis.as_ref().unwrap();
    assert_eq!(analysis.features.width, 160);
    assert_eq!(analysis.ai_analysis.product_category, "Snack box");
    assert_eq!(analysis.ai_analysis.visual_appeal_score, 4);
    assert!(analysis.recommendations.len() <= 5);

    let branding = &result.branding_recommendations;
    assert_eq!(branding.brand_positioning, "The freshest snack box in Denver.");
    assert_eq!(branding.key_messaging, vec!["Snacks that do good", "Fresh every week"]);
    assert!(!branding.color_palette.is_empty());

    assert_eq!(result.financial_projections.revenue_projections["Year 1"], "$80,000");
    assert_eq!(
        result.risk_assessment.mitigation_strategies["Spoilage"],
        "Smaller batches"
    );
    assert_eq!(result.executive_summary, "A viable local snack subscription.");
    assert_eq!(result.next_steps, vec!["Find a kitchen"]);

    let prompts = backend.prompts();
    assert!(prompts[0].contains("Analyze this product image"));
    assert!(prompts.last().unwrap().contains("Create an executive summary"));

    let copy = orchestrator.generate_website_copy(&result).await;
    assert_eq!(copy.hero, "Fresh snacks, weekly");
    assert_eq!(copy.cta, "Build your box");
}

#[tokio::test]
async fn test_result_serializes_flat_scores() {
    let backend = Arc::new(ScriptedBackend::new(RULES.to_vec()));
    let orchestrator = EvaluationOrchestrator::new(backend, Config::default());
    let result = orchestrator
        .evaluate_business_concept(&concept(described_product()), EvaluationOptions::default())
        .await
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["overall_success_score"], 68.0);
    assert_eq!(json["market_insights"]["competition_level"], "low");
    assert!(json["image_analysis"].is_null());
    assert_eq!(json["model_version"], "1.0.0");
}

#[tokio::test]
async fn test_timeouts_degrade_to_fallbacks() {
    let orchestrator = EvaluationOrchestrator::new(Arc::new(TimingOutBackend), Config::default());
    let result = orchestrator
        .evaluate_business_concept(&concept(described_product()), EvaluationOptions::default())
        .await
        .unwrap();

    assert_eq!(result.overall_success_score(), 50.0);
    assert_eq!(result.confidence_level(), 25.0);
    assert_eq!(result.market_insights.trends, vec!["Unable to determine current trends"]);
    assert_eq!(result.executive_summary, "Summary not available");
    assert!(result.recommendations.is_empty());
}

#[tokio::test]
async fn test_background_task_reports_completion() {
    let backend = Arc::new(ScriptedBackend::new(RULES.to_vec()));
    let orchestrator = Arc::new(EvaluationOrchestrator::new(backend, Config::default()));
    let options = EvaluationOptions {
        include_branding: false,
        include_financial: true,
    };

    let task = EvaluationTask::spawn(orchestrator, concept(described_product()), options);
    let result = task.wait().await.unwrap();

    assert_eq!(task.status(), TaskStatus::Completed);
    assert_eq!(result.branding_recommendations.brand_positioning, "Not generated");
    assert!(!result.financial_projections.is_empty());
}
