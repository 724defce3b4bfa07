//! Provider Selection
//!
//! Environment-driven choice of which hosted (or local) model answers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axe_core::{GenerationOptions, LlmProvider, ModelError, Result};

use crate::gemini::{GeminiConfig, GeminiProvider};
use crate::openrouter::{self, OpenRouterConfig, OpenRouterProvider};

#[cfg(feature = "ollama")]
use crate::ollama::{OllamaConfig, OllamaProvider};

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Which backend answers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Google,
    OpenRouter,
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "gemini" => Ok(Self::Google),
            "openrouter" => Ok(Self::OpenRouter),
            "ollama" => Ok(Self::Ollama),
            other => Err(ModelError::Config(format!("unknown API_PROVIDER '{other}'"))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::OpenRouter => write!(f, "openrouter"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// Runtime configuration for the model client
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub google_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    #[cfg(feature = "ollama")]
    pub ollama: OllamaConfig,
}

impl RuntimeConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = get("API_PROVIDER")
            .map(|p| p.parse::<ProviderKind>())
            .transpose()?
            .unwrap_or_default();

        let temperature = match get("TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ModelError::Config(format!("TEMPERATURE '{raw}' is not a number")))?,
            None => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            provider,
            model: get("MODEL_NAME").unwrap_or_else(|| axe_core::provider::DEFAULT_MODEL.into()),
            temperature,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            google_api_key: get("GOOGLE_API_KEY"),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_base_url: get("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| openrouter::DEFAULT_BASE_URL.into()),
            #[cfg(feature = "ollama")]
            ollama: OllamaConfig::from_lookup(&lookup),
        })
    }

    /// Generation options shared by both analysis stages
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            ..Default::default()
        }
    }

    /// Construct the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn LlmProvider>> {
        match self.provider {
            ProviderKind::Google => {
                let key = self
                    .google_api_key
                    .clone()
                    .ok_or_else(|| ModelError::Config("GOOGLE_API_KEY is not set".into()))?;
                let config = GeminiConfig {
                    timeout_secs: self.timeout_secs,
                    ..GeminiConfig::new(key)
                };
                Ok(Arc::new(GeminiProvider::from_config(config)?))
            }
            ProviderKind::OpenRouter => {
                let key = self
                    .openrouter_api_key
                    .clone()
                    .ok_or_else(|| ModelError::Config("OPENROUTER_API_KEY is not set".into()))?;
                let config = OpenRouterConfig {
                    timeout_secs: self.timeout_secs,
                    ..OpenRouterConfig::new(key)
                }
                .with_base_url(self.openrouter_base_url.clone());
                Ok(Arc::new(OpenRouterProvider::from_config(config)?))
            }
            #[cfg(feature = "ollama")]
            ProviderKind::Ollama => Ok(Arc::new(OllamaProvider::from_config(&self.ollama))),
            #[cfg(not(feature = "ollama"))]
            ProviderKind::Ollama => Err(ModelError::Config(
                "built without the `ollama` feature".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<RuntimeConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RuntimeConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.provider, ProviderKind::Google);
        assert_eq!(cfg.model, "gemini-1.5-flash");
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.openrouter_base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("OpenRouter".parse::<ProviderKind>().unwrap(), ProviderKind::OpenRouter);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Google);
        assert!("bedrock".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let cfg = config(&[("API_PROVIDER", "google")]).unwrap();
        assert!(matches!(cfg.build_provider(), Err(ModelError::Config(_))));

        let cfg = config(&[("API_PROVIDER", "openrouter"), ("OPENROUTER_API_KEY", "")]).unwrap();
        assert!(matches!(cfg.build_provider(), Err(ModelError::Config(_))));
    }

    #[test]
    fn test_builds_openrouter() {
        let cfg = config(&[
            ("API_PROVIDER", "openrouter"),
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("MODEL_NAME", "meta-llama/llama-3.1-8b-instruct"),
            ("TEMPERATURE", "0.2"),
        ])
        .unwrap();

        assert!(cfg.build_provider().is_ok());
        let opts = cfg.generation_options();
        assert_eq!(opts.model, "meta-llama/llama-3.1-8b-instruct");
        assert!((opts.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bad_temperature() {
        assert!(matches!(
            config(&[("TEMPERATURE", "warm")]),
            Err(ModelError::Config(_))
        ));
    }
}
