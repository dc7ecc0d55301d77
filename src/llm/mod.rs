//! Text and vision generation capability

use async_trait::async_trait;

use crate::error::Result;

pub mod client;

pub use client::LLMClient;

/// Per-call generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Requested model, `None` uses the configured default
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

impl GenerationOptions {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            ..Self::default()
        }
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Uniform access to a text/vision generation backend.
///
/// Implementations do not retry on their own behalf beyond what their configuration asks
/// for; callers turn failures into stage fallbacks.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    async fn analyze_image(&self, image: &[u8], prompt: &str, model: Option<&str>)
    -> Result<String>;

    /// Whether at least one backend is configured
    fn is_available(&self) -> bool;

    fn available_models(&self) -> Vec<String>;
}
