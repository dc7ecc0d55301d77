use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::generator::workflow::EvaluationOptions;
use crate::types::{BusinessConcept, ProductImage};

/// flowco-rs - AI-assisted business concept evaluation
#[derive(Parser, Debug)]
#[command(name = "flowco-rs")]
#[command(
    about = "Evaluates a business concept with large language models: market insights, headline scores, branding, risks and a financial outlook."
)]
#[command(version)]
pub struct Args {
    /// Business concept file (TOML or JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Product image, replaces any image named in the concept file
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the branding stage
    #[arg(long)]
    pub no_branding: bool,

    /// Skip the financial projection stage
    #[arg(long)]
    pub no_financial: bool,

    /// Write the evaluation result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Default text generation model
    #[arg(long)]
    pub model: Option<String>,

    /// Model used for product image critique
    #[arg(long)]
    pub vision_model: Option<String>,

    #[arg(long)]
    pub openai_api_key: Option<String>,

    #[arg(long)]
    pub anthropic_api_key: Option<String>,

    /// Route requests to a local Ollama server
    #[arg(long)]
    pub use_local_models: bool,

    /// Per-call timeout (seconds)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Disable the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Also generate landing page copy
    #[arg(long)]
    pub website_copy: bool,
}

impl Args {
    /// Convert CLI arguments into a configuration
    pub fn into_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => {
                let default_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("flowco.toml");
                if default_path.exists() {
                    Config::from_file(&default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(model) = &self.model {
            config.llm.default_model = model.clone();
        }
        if let Some(vision_model) = &self.vision_model {
            config.llm.vision_model = vision_model.clone();
        }
        if let Some(key) = &self.openai_api_key {
            config.llm.openai_api_key = Some(key.clone());
        }
        if let Some(key) = &self.anthropic_api_key {
            config.llm.anthropic_api_key = Some(key.clone());
        }
        if self.use_local_models {
            config.llm.use_local_models = true;
        }
        if let Some(timeout) = self.timeout {
            config.llm.timeout_seconds = timeout;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }

    pub fn options(&self) -> EvaluationOptions {
        EvaluationOptions {
            include_branding: !self.no_branding,
            include_financial: !self.no_financial,
        }
    }

    /// Read the concept file and apply `--image`
    pub fn load_concept(&self) -> Result<BusinessConcept> {
        let mut concept = read_concept(&self.input)?;
        if let Some(image) = &self.image {
            concept.product_info = concept
                .product_info
                .with_image(ProductImage::Path(image.clone()));
        }
        Ok(concept)
    }
}

fn read_concept(path: &Path) -> Result<BusinessConcept> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read concept file: {:?}", path))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "toml" => toml::from_str(&content).context("Failed to parse concept TOML"),
        "json" => serde_json::from_str(&content).context("Failed to parse concept JSON"),
        other => bail!("Unsupported concept file extension: {:?}", other),
    }
}
