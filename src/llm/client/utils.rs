use crate::config::LLMProvider;

pub const OPENAI_FALLBACK_MODEL: &str = "gpt-3.5-turbo";
pub const ANTHROPIC_FALLBACK_MODEL: &str = "claude-3-haiku-20240307";
pub const OLLAMA_FALLBACK_MODEL: &str = "llama2";

const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4-turbo", "gpt-4", "gpt-3.5-turbo"];
const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];
const OLLAMA_MODELS: &[&str] = &["llama2", "mistral", "codellama"];

/// Backend and model chosen for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub provider: LLMProvider,
    pub model: String,
}

impl Route {
    fn new(provider: LLMProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

/// Route a text generation request.
///
/// A model name naming a configured vendor goes to that vendor; local models take
/// everything else when enabled; otherwise the first configured backend answers with its
/// fallback model. `None` when nothing is configured.
pub fn select_provider(model: &str, configured: &[LLMProvider]) -> Option<Route> {
    let lowered = model.to_lowercase();
    let has = |provider: LLMProvider| configured.contains(&provider);

    if has(LLMProvider::OpenAI) && lowered.contains("gpt") {
        return Some(Route::new(LLMProvider::OpenAI, model));
    }
    if has(LLMProvider::Anthropic) && lowered.contains("claude") {
        return Some(Route::new(LLMProvider::Anthropic, model));
    }
    if has(LLMProvider::Ollama) {
        return Some(Route::new(LLMProvider::Ollama, model));
    }

    [
        (LLMProvider::OpenAI, OPENAI_FALLBACK_MODEL),
        (LLMProvider::Anthropic, ANTHROPIC_FALLBACK_MODEL),
        (LLMProvider::Ollama, OLLAMA_FALLBACK_MODEL),
    ]
    .into_iter()
    .find(|(provider, _)| has(*provider))
    .map(|(provider, fallback)| Route::new(provider, fallback))
}

/// Route an image analysis request. Only hosted vision models are supported.
pub fn select_vision_provider(model: &str, configured: &[LLMProvider]) -> Option<Route> {
    let lowered = model.to_lowercase();
    if configured.contains(&LLMProvider::OpenAI) && lowered.contains("gpt") {
        Some(Route::new(LLMProvider::OpenAI, model))
    } else if configured.contains(&LLMProvider::Anthropic) && lowered.contains("claude") {
        Some(Route::new(LLMProvider::Anthropic, model))
    } else {
        None
    }
}

/// Models that can be requested given the configured backends
pub fn available_models(configured: &[LLMProvider]) -> Vec<String> {
    configured
        .iter()
        .flat_map(|provider| match provider {
            LLMProvider::OpenAI => OPENAI_MODELS,
            LLMProvider::Anthropic => ANTHROPIC_MODELS,
            LLMProvider::Ollama => OLLAMA_MODELS,
        })
        .map(|model| model.to_string())
        .collect()
}

/// MIME type from the leading magic bytes, JPEG when unrecognized
pub fn image_media_type(data: &[u8]) -> &'static str {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else if data.starts_with(b"RIFF") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [LLMProvider; 3] = [
        LLMProvider::OpenAI,
        LLMProvider::Anthropic,
        LLMProvider::Ollama,
    ];

    #[test]
    fn test_routes_by_model_name() {
        assert_eq!(
            select_provider("gpt-4o", &ALL),
            Some(Route::new(LLMProvider::OpenAI, "gpt-4o"))
        );
        assert_eq!(
            select_provider("claude-3-opus-20240229", &ALL),
            Some(Route::new(LLMProvider::Anthropic, "claude-3-opus-20240229"))
        );
        assert_eq!(
            select_provider("mistral", &ALL),
            Some(Route::new(LLMProvider::Ollama, "mistral"))
        );
    }

    #[test]
    fn test_falls_back_in_priority_order() {
        assert_eq!(
            select_provider("claude-3-opus-20240229", &[LLMProvider::OpenAI]),
            Some(Route::new(LLMProvider::OpenAI, OPENAI_FALLBACK_MODEL))
        );
        assert_eq!(
            select_provider("gpt-4", &[LLMProvider::Anthropic]),
            Some(Route::new(LLMProvider::Anthropic, ANTHROPIC_FALLBACK_MODEL))
        );
        assert_eq!(
            select_provider("GPT-4", &[LLMProvider::Ollama]),
            Some(Route::new(LLMProvider::Ollama, "GPT-4"))
        );
    }

    #[test]
    fn test_no_backend_configured() {
        assert_eq!(select_provider("gpt-4", &[]), None);
        assert!(available_models(&[]).is_empty());
    }

    #[test]
    fn test_vision_routing() {
        assert_eq!(
            select_vision_provider("gpt-4o", &ALL).map(|r| r.provider),
            Some(LLMProvider::OpenAI)
        );
        assert_eq!(select_vision_provider("llava", &ALL), None);
        assert_eq!(select_vision_provider("gpt-4o", &[LLMProvider::Anthropic]), None);
    }

    #[test]
    fn test_available_models() {
        let models = available_models(&[LLMProvider::Anthropic, LLMProvider::Ollama]);
        assert!(models.contains(&"claude-3-haiku-20240307".to_string()));
        assert!(models.contains(&"llama2".to_string()));
        assert!(!models.iter().any(|m| m.starts_with("gpt")));
    }

    #[test]
    fn test_image_media_type() {
        assert_eq!(image_media_type(b"\x89PNG\r\n\x1a\n0000"), "image/png");
        assert_eq!(image_media_type(b"GIF89a000000"), "image/gif");
        assert_eq!(image_media_type(b"RIFF0000WEBP"), "image/webp");
        assert_eq!(image_media_type(b"\xff\xd8\xff\xe0"), "image/jpeg");
    }
}
