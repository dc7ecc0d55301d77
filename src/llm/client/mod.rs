//! Production generation client over the configured providers

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{CacheManager, CachePerformanceReport};
use crate::config::{Config, LLMConfig, LLMProvider};
use crate::error::{EvaluationError, Result};
use crate::llm::{GenerationClient, GenerationOptions};

mod providers;
pub mod utils;
mod vision;

use providers::ProviderClient;
use utils::{Route, select_provider, select_vision_provider};
use vision::VisionClient;

const TEXT_CACHE: &str = "text";
const VISION_CACHE: &str = "vision";

/// Routes each call to one of the configured providers
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    providers: Vec<ProviderClient>,
    vision: VisionClient,
    cache: Arc<CacheManager>,
}

impl LLMClient {
    /// Create a client for every provider that has credentials.
    ///
    /// A provider whose client cannot be built is skipped with a warning; having none
    /// at all is not an error here, `is_available` reports it.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut providers = Vec::new();
        for provider in config.configured_providers() {
            match ProviderClient::new(provider, &config.llm) {
                Ok(client) => {
                    info!(%provider, "generation provider initialized");
                    providers.push(client);
                }
                Err(e) => warn!(%provider, error = %e, "failed to initialize provider"),
            }
        }

        Ok(Self {
            config: config.llm.clone(),
            providers,
            vision: VisionClient::new(&config.llm)?,
            cache: Arc::new(CacheManager::new(config.cache.clone())),
        })
    }

    /// Hit/miss statistics of the response cache
    pub fn cache_report(&self) -> CachePerformanceReport {
        self.cache.generate_performance_report()
    }

    fn configured(&self) -> Vec<LLMProvider> {
        self.providers.iter().map(ProviderClient::provider).collect()
    }

    fn provider_client(&self, provider: LLMProvider) -> Result<&ProviderClient> {
        self.providers
            .iter()
            .find(|client| client.provider() == provider)
            .ok_or_else(|| {
                EvaluationError::ServiceUnavailable(format!("{} is not configured", provider))
            })
    }

    fn route_text(&self, options: &GenerationOptions) -> Result<Route> {
        let model = options
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);
        select_provider(model, &self.configured()).ok_or_else(|| {
            EvaluationError::ServiceUnavailable(
                "configure an OpenAI or Anthropic API key, or enable local models".to_string(),
            )
        })
    }

    fn cache_key(route: &Route, options: &GenerationOptions, prompt: &str) -> String {
        format!(
            "{}::{}::{}::{}::{}",
            route.provider, route.model, options.max_tokens, options.temperature, prompt
        )
    }

    /// Bound one attempt by the configured timeout
    async fn with_timeout<T, Fut>(&self, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let seconds = self.config.timeout_seconds;
        tokio::time::timeout(Duration::from_secs(seconds), operation)
            .await
            .map_err(|_| EvaluationError::Timeout(seconds))?
    }

    /// Shared retry loop; `retry_attempts` counts total attempts
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut attempts = 0;

        loop {
            match self.with_timeout(operation()).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return Err(err);
                    }
                    warn!(
                        attempt = attempts,
                        max_attempts,
                        error = %err,
                        "generation call failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl GenerationClient for LLMClient {
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let route = self.route_text(options)?;
        let client = self.provider_client(route.provider)?;
        let cache_key = Self::cache_key(&route, options, prompt);

        if let Some(cached) = self.cache.get::<String>(TEXT_CACHE, &cache_key).await {
            return Ok(cached);
        }

        debug!(
            provider = %route.provider,
            model = %route.model,
            prompt_chars = prompt.len(),
            max_tokens = options.max_tokens,
            "generating text"
        );

        let response = self
            .retry_with_backoff(|| async {
                let agent = client.create_agent(&route.model, options);
                agent.prompt(prompt).await.map_err(EvaluationError::generation)
            })
            .await?;

        if let Err(e) = self
            .cache
            .set(TEXT_CACHE, &cache_key, &response, Some(&route.model))
            .await
        {
            warn!(error = %e, "failed to cache generated text");
        }
        Ok(response)
    }

    async fn analyze_image(
        &self,
        image: &[u8],
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String> {
        let model = model.unwrap_or(&self.config.vision_model);

        let Some(route) = select_vision_provider(model, &self.configured()) else {
            debug!(model, "no vision backend for model, describing image in text");
            let fallback_prompt = format!(
                "Based on this prompt about an image: {}\nPlease provide a general analysis assuming this is a product image.",
                prompt
            );
            return self
                .generate_text(&fallback_prompt, &GenerationOptions::default())
                .await;
        };

        let cache_key = format!(
            "{}::{}::{}",
            route.model,
            self.cache.hash_key(image),
            prompt
        );
        if let Some(cached) = self.cache.get::<String>(VISION_CACHE, &cache_key).await {
            return Ok(cached);
        }

        debug!(provider = %route.provider, model = %route.model, bytes = image.len(), "analyzing image");

        let response = self
            .retry_with_backoff(|| async {
                self.vision
                    .analyze(&route, image, prompt)
                    .await
                    .map_err(EvaluationError::generation)
            })
            .await?;

        if let Err(e) = self
            .cache
            .set(VISION_CACHE, &cache_key, &response, Some(&route.model))
            .await
        {
            warn!(error = %e, "failed to cache image analysis");
        }
        Ok(response)
    }

    fn is_available(&self) -> bool {
        !self.providers.is_empty()
    }

    fn available_models(&self) -> Vec<String> {
        utils::available_models(&self.configured())
    }
}
