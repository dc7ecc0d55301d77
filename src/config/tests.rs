#[cfg(test)]
mod tests {
    use crate::config::{CacheConfig, Config, LLMConfig, LLMProvider, ProcessingConfig};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.processing.max_image_size, 5_242_880);
        assert_eq!(config.processing.max_image_dimension, 1024);
        assert_eq!(config.research.max_search_results, 10);
        assert!(!config.cache.enabled);
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_provider_default() {
        assert_eq!(LLMProvider::default(), LLMProvider::OpenAI);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!(
            "openai".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenAI
        );
        assert_eq!(
            "Anthropic".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!(
            "OLLAMA".parse::<LLMProvider>().unwrap(),
            LLMProvider::Ollama
        );
        assert!("mistral".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display() {
        assert_eq!(LLMProvider::OpenAI.to_string(), "openai");
        assert_eq!(LLMProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(LLMProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_llm_config_default_limits() {
        let llm = LLMConfig::default();
        assert_eq!(llm.max_tokens, 2000);
        assert_eq!(llm.temperature, 0.7);
        assert_eq!(llm.retry_attempts, 1);
        assert_eq!(llm.timeout_seconds, 45);
        assert_eq!(llm.vision_model, "gpt-4o");
    }

    #[test]
    fn test_cache_config_default() {
        let cache = CacheConfig::default();
        assert!(!cache.enabled);
        assert_eq!(cache.cache_dir, PathBuf::from(".flowco/cache"));
        assert_eq!(cache.expire_hours, 24);
    }

    #[test]
    fn test_supported_formats() {
        let config = Config::default();
        assert!(config.processing.is_supported_format("PNG"));
        assert!(config.processing.is_supported_format(".jpeg"));
        assert!(config.processing.is_supported_format("gif"));
        assert!(!config.processing.is_supported_format("bmp"));

        let processing = ProcessingConfig {
            supported_formats: vec!["png".to_string()],
            ..ProcessingConfig::default()
        };
        let config = Config {
            processing,
            ..Config::default()
        };
        assert!(!config.processing.is_supported_format("jpg"));
    }

    #[test]
    fn test_configured_providers_order() {
        let mut config = Config::default();
        config.llm.openai_api_key = None;
        config.llm.anthropic_api_key = None;
        config.llm.use_local_models = false;
        assert!(config.configured_providers().is_empty());

        config.llm.use_local_models = true;
        config.llm.anthropic_api_key = Some("sk-ant".to_string());
        config.llm.openai_api_key = Some("sk-openai".to_string());
        assert_eq!(
            config.configured_providers(),
            vec![
                LLMProvider::OpenAI,
                LLMProvider::Anthropic,
                LLMProvider::Ollama
            ]
        );
    }

    #[test]
    fn test_configured_providers_ignores_blank_keys() {
        let mut config = Config::default();
        config.llm.openai_api_key = Some("   ".to_string());
        config.llm.anthropic_api_key = None;
        config.llm.use_local_models = false;
        assert!(config.configured_providers().is_empty());
    }

    #[test]
    fn test_config_from_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("flowco.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
verbose = true

[llm]
default_model = "claude-3-haiku-20240307"
timeout_seconds = 10

[processing]
max_image_size = 1024
"#
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert!(config.verbose);
        assert_eq!(config.llm.default_model, "claude-3-haiku-20240307");
        assert_eq!(config.llm.timeout_seconds, 10);
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.processing.max_image_size, 1024);
        assert_eq!(config.processing.supported_formats.len(), 5);
        assert_eq!(config.research.max_search_results, 10);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/flowco.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "[llm\nmax_tokens = ").unwrap();
        assert!(Config::from_file(&config_path).is_err());
    }
}
