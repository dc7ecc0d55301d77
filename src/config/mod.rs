use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM backend type
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// Application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// Generation backends
    pub llm: LLMConfig,

    /// Input validation limits
    pub processing: ProcessingConfig,

    /// Market research limits
    pub research: ResearchConfig,

    /// Response cache
    pub cache: CacheConfig,

    /// Enable verbose logging
    pub verbose: bool,
}

/// Generation backend configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    pub openai_api_key: Option<String>,

    pub anthropic_api_key: Option<String>,

    /// Route unmatched models to the local Ollama server
    pub use_local_models: bool,

    pub openai_base_url: String,

    pub anthropic_base_url: String,

    pub ollama_base_url: String,

    /// Model used when a stage does not request one
    pub default_model: String,

    /// Model used for product image critique
    pub vision_model: String,

    pub max_tokens: u32,

    pub temperature: f64,

    /// Total attempts per call, 1 disables retry
    pub retry_attempts: u32,

    /// Delay between attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Per-call timeout (seconds)
    pub timeout_seconds: u64,
}

/// Input processing limits
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Maximum accepted image file size (bytes)
    pub max_image_size: u64,

    /// Accepted image file extensions, lowercase without the dot
    pub supported_formats: Vec<String>,

    /// Images are downscaled until their longer side fits this bound
    pub max_image_dimension: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// Upper bound for every generated list
    pub max_search_results: usize,
}

/// Cache configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether caching is enabled
    pub enabled: bool,

    /// Cache directory
    pub cache_dir: PathBuf,

    /// Cache expiry (hours)
    pub expire_hours: u64,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Providers that have credentials or are enabled, in fallback priority order
    pub fn configured_providers(&self) -> Vec<LLMProvider> {
        let mut providers = Vec::new();
        if self.llm.openai_api_key.as_deref().is_some_and(has_value) {
            providers.push(LLMProvider::OpenAI);
        }
        if self.llm.anthropic_api_key.as_deref().is_some_and(has_value) {
            providers.push(LLMProvider::Anthropic);
        }
        if self.llm.use_local_models {
            providers.push(LLMProvider::Ollama);
        }
        providers
    }
}

impl ProcessingConfig {
    /// Whether the given file extension is accepted for product images
    pub fn is_supported_format(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.supported_formats
            .iter()
            .any(|format| format.eq_ignore_ascii_case(extension))
    }
}

fn has_value(value: &str) -> bool {
    !value.trim().is_empty()
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| has_value(k)),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| has_value(k)),
            use_local_models: env_flag("USE_LOCAL_MODELS"),
            openai_base_url: String::from("https://api.openai.com/v1"),
            anthropic_base_url: String::from("https://api.anthropic.com/v1"),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| String::from("http://localhost:11434")),
            default_model: std::env::var("DEFAULT_AI_MODEL")
                .unwrap_or_else(|_| String::from("gpt-3.5-turbo")),
            vision_model: String::from("gpt-4o"),
            max_tokens: 2000,
            temperature: 0.7,
            retry_attempts: 1,
            retry_delay_ms: 2000,
            timeout_seconds: 45,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_image_size: 5 * 1024 * 1024, // 5MB
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "gif".to_string(),
            ],
            max_image_dimension: 1024,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_search_results: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cache_dir: PathBuf::from(".flowco/cache"),
            expire_hours: 24,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
