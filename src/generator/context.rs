use std::sync::Arc;
use tracing::{error, warn};

use crate::config::Config;
use crate::error::Result;
use crate::generator::parsing::{Parsed, extract_classification, extract_list, extract_score};
use crate::generator::prompt::PromptTemplate;
use crate::llm::{GenerationClient, GenerationOptions};

/// Shared state of one evaluation engine: the generation capability and configuration.
///
/// Cheap to clone; concurrent evaluations share it read-only.
#[derive(Clone)]
pub struct GeneratorContext {
    /// Generation backend
    pub client: Arc<dyn GenerationClient>,
    pub config: Config,
}

impl GeneratorContext {
    pub fn new(client: Arc<dyn GenerationClient>, config: Config) -> Self {
        Self { client, config }
    }

    /// List cap for a call site, bounded by the configured result limit
    pub fn list_cap(&self, call_site_max: usize) -> usize {
        call_site_max.min(self.config.research.max_search_results)
    }

    /// Issue one generation call with the configured temperature
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let options = GenerationOptions {
            model: None,
            max_tokens,
            temperature: self.config.llm.temperature,
        };
        self.client.generate_text(prompt, &options).await
    }

    /// 0-100 score; 50 on failure or when no number is present
    pub async fn prompt_score(&self, task: &str, template: &PromptTemplate, max_tokens: u32) -> f64 {
        match self.generate(&template.render(), max_tokens).await {
            Ok(reply) => log_default(task, extract_score(&reply, 50.0)),
            Err(e) => {
                error!(task, error = %e, "generation failed, using neutral score");
                50.0
            }
        }
    }

    /// One of `labels`; `default` on failure or an unexpected reply
    pub async fn prompt_classification(
        &self,
        task: &str,
        template: &PromptTemplate,
        max_tokens: u32,
        labels: &[&str],
        default: &str,
    ) -> String {
        match self.generate(&template.render(), max_tokens).await {
            Ok(reply) => log_default(task, extract_classification(&reply, labels, default)),
            Err(e) => {
                error!(task, error = %e, "generation failed, using default classification");
                default.to_string()
            }
        }
    }

    /// Parsed list capped at `max_items`; `fallback` only when the call itself fails
    pub async fn prompt_list(
        &self,
        task: &str,
        template: &PromptTemplate,
        max_tokens: u32,
        max_items: usize,
        fallback: Vec<String>,
    ) -> Vec<String> {
        match self.generate(&template.render(), max_tokens).await {
            Ok(reply) => log_default(task, extract_list(&reply, self.list_cap(max_items))),
            Err(e) => {
                error!(task, error = %e, "generation failed, using fallback list");
                fallback
            }
        }
    }

    /// Trimmed free text; `fallback` on failure or an empty reply
    pub async fn prompt_text(
        &self,
        task: &str,
        template: &PromptTemplate,
        max_tokens: u32,
        fallback: &str,
    ) -> String {
        match self.generate(&template.render(), max_tokens).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                warn!(task, "empty reply, using fallback text");
                fallback.to_string()
            }
            Err(e) => {
                error!(task, error = %e, "generation failed, using fallback text");
                fallback.to_string()
            }
        }
    }
}

fn log_default<T>(task: &str, parsed: Parsed<T>) -> T {
    if parsed.used_default {
        warn!(task, "reply did not match the expected shape, using default");
    }
    parsed.value
}
