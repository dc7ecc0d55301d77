//! Hosted vision endpoints, called directly over HTTP

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::{LLMConfig, LLMProvider};
use crate::llm::client::utils::{Route, image_media_type};

const VISION_MAX_TOKENS: u32 = 1000;
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    openai_base_url: String,
    anthropic_base_url: String,
    openai_api_key: Option<String>,
    anthropic_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl VisionClient {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build vision HTTP client")?;

        Ok(Self {
            http,
            openai_base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            anthropic_base_url: config.anthropic_base_url.trim_end_matches('/').to_string(),
            openai_api_key: config.openai_api_key.clone(),
            anthropic_api_key: config.anthropic_api_key.clone(),
        })
    }

    pub async fn analyze(&self, route: &Route, image: &[u8], prompt: &str) -> Result<String> {
        let encoded = STANDARD.encode(image);
        let media_type = image_media_type(image);
        match route.provider {
            LLMProvider::OpenAI => {
                self.analyze_openai(&route.model, &encoded, media_type, prompt)
                    .await
            }
            LLMProvider::Anthropic => {
                self.analyze_anthropic(&route.model, &encoded, media_type, prompt)
                    .await
            }
            LLMProvider::Ollama => Err(anyhow!("local models do not support image analysis")),
        }
    }

    async fn analyze_openai(
        &self,
        model: &str,
        encoded: &str,
        media_type: &str,
        prompt: &str,
    ) -> Result<String> {
        let api_key = self
            .openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OpenAI API key is not configured"))?;

        let body = json!({
            "model": model,
            "max_tokens": VISION_MAX_TOKENS,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": prompt},
                    {
                        "type": "image_url",
                        "image_url": {"url": format!("data:{};base64,{}", media_type, encoded)}
                    }
                ]
            }]
        });

        let response: ChatCompletionResponse = self
            .http
            .post(format!("{}/chat/completions", self.openai_base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI vision request failed")?
            .error_for_status()
            .context("OpenAI vision request rejected")?
            .json()
            .await
            .context("Failed to decode OpenAI vision response")?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("OpenAI vision response contained no content"))
    }

    async fn analyze_anthropic(
        &self,
        model: &str,
        encoded: &str,
        media_type: &str,
        prompt: &str,
    ) -> Result<String> {
        let api_key = self
            .anthropic_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("Anthropic API key is not configured"))?;

        let body = json!({
            "model": model,
            "max_tokens": VISION_MAX_TOKENS,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "image",
                        "source": {"type": "base64", "media_type": media_type, "data": encoded}
                    },
                    {"type": "text", "text": prompt}
                ]
            }]
        });

        let response: MessagesResponse = self
            .http
            .post(format!("{}/messages", self.anthropic_base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .context("Anthropic vision request failed")?
            .error_for_status()
            .context("Anthropic vision request rejected")?
            .json()
            .await
            .context("Failed to decode Anthropic vision response")?;

        response
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| anyhow!("Anthropic vision response contained no text"))
    }
}
