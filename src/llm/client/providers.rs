//! rig-backed provider clients

use anyhow::{Result, anyhow};
use rig::{agent::Agent, client::CompletionClient, completion::Prompt};

use crate::config::{LLMConfig, LLMProvider};
use crate::llm::GenerationOptions;

/// One configured backend
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Anthropic(rig::providers::anthropic::Client),
    Ollama(rig::providers::ollama::Client),
}

impl ProviderClient {
    /// Create the client for `provider` from the configured credentials
    pub fn new(provider: LLMProvider, config: &LLMConfig) -> Result<Self> {
        match provider {
            LLMProvider::OpenAI => {
                let api_key = config
                    .openai_api_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("OpenAI API key is not configured"))?;
                let client = rig::providers::openai::Client::builder(api_key)
                    .base_url(&config.openai_base_url)
                    .build();
                Ok(ProviderClient::OpenAI(client))
            }
            LLMProvider::Anthropic => {
                let api_key = config
                    .anthropic_api_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("Anthropic API key is not configured"))?;
                let client = rig::providers::anthropic::ClientBuilder::new(api_key).build()?;
                Ok(ProviderClient::Anthropic(client))
            }
            LLMProvider::Ollama => {
                let client = rig::providers::ollama::Client::builder()
                    .base_url(&config.ollama_base_url)
                    .build();
                Ok(ProviderClient::Ollama(client))
            }
        }
    }

    pub fn provider(&self) -> LLMProvider {
        match self {
            ProviderClient::OpenAI(_) => LLMProvider::OpenAI,
            ProviderClient::Anthropic(_) => LLMProvider::Anthropic,
            ProviderClient::Ollama(_) => LLMProvider::Ollama,
        }
    }

    /// Build a single-turn agent for one call
    pub fn create_agent(&self, model: &str, options: &GenerationOptions) -> ProviderAgent {
        match self {
            ProviderClient::OpenAI(client) => {
                let agent = client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .max_tokens(options.max_tokens.into())
                    .temperature(options.temperature)
                    .build();
                ProviderAgent::OpenAI(agent)
            }
            ProviderClient::Anthropic(client) => {
                let agent = client
                    .agent(model)
                    .max_tokens(options.max_tokens.into())
                    .temperature(options.temperature)
                    .build();
                ProviderAgent::Anthropic(agent)
            }
            ProviderClient::Ollama(client) => {
                let agent = client
                    .agent(model)
                    .max_tokens(options.max_tokens.into())
                    .temperature(options.temperature)
                    .build();
                ProviderAgent::Ollama(agent)
            }
        }
    }
}

/// Agent bound to one provider and model
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
        }
    }
}
