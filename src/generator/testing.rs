//! In-memory generation backends for stage tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::{EvaluationError, Result};
use crate::generator::context::GeneratorContext;
use crate::llm::{GenerationClient, GenerationOptions};
use crate::types::{BusinessCategory, BusinessConcept, Demographics, IncomeRange, ProductInfo};

/// Replies by the first rule whose needle occurs in the prompt
#[derive(Default)]
pub struct ScriptedClient {
    rules: Vec<(String, String)>,
    fallback: Option<String>,
    offline: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, needle: &str, reply: &str) -> Self {
        self.rules.push((needle.to_string(), reply.to_string()));
        self
    }

    pub fn otherwise(mut self, reply: &str) -> Self {
        self.fallback = Some(reply.to_string());
        self
    }

    /// Report no configured backend
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn answer(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| EvaluationError::generation("no scripted reply"))
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate_text(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
        self.answer(prompt)
    }

    async fn analyze_image(
        &self,
        _image: &[u8],
        prompt: &str,
        _model: Option<&str>,
    ) -> Result<String> {
        self.answer(prompt)
    }

    fn is_available(&self) -> bool {
        !self.offline
    }

    fn available_models(&self) -> Vec<String> {
        vec!["scripted".to_string()]
    }
}

pub fn context_with(client: Arc<ScriptedClient>) -> GeneratorContext {
    GeneratorContext::new(client, Config::default())
}

pub fn sample_concept() -> BusinessConcept {
    let demographics = Demographics::new(25, 40, IncomeRange::Middle, "Austin, TX")
        .unwrap()
        .with_interests(["coffee", "fitness"]);
    let product = ProductInfo::builder()
        .name(Some("BrewBox".to_string()))
        .description(Some("Subscription box of local roasts".to_string()))
        .category(Some(BusinessCategory::FoodBeverage))
        .features(vec!["Weekly delivery".to_string(), "Local roasters".to_string()])
        .build()
        .unwrap();

    BusinessConcept::new("Coffee subscription for busy professionals", demographics, product)
        .with_competitive_advantages(vec!["Curated local beans".to_string()])
}
