pub mod chat;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmType {
    Gemini,
    OpenAI,
    Ollama,
}

impl LlmType {
    /// Whether the provider refuses requests without an API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmType::Ollama)
    }
}

impl fmt::Display for LlmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmType::Gemini => "gemini",
            LlmType::OpenAI => "openai",
            LlmType::Ollama => "ollama",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLlmTypeError {
    message: String,
}

impl fmt::Display for ParseLlmTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseLlmTypeError {}
impl FromStr for LlmType {
    type Err = ParseLlmTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmType::Gemini),
            "openai" => Ok(LlmType::OpenAI),
            "ollama" => Ok(LlmType::Ollama),
            _ =>
                Err(ParseLlmTypeError {
                    message: format!("Invalid LLM type: '{}'", s),
                }),
        }
    }
}

/// Reasons the external chat service could not produce an answer. Callers
/// treat every variant the same way: the service is unavailable for this turn.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0} API key is required")] MissingCredential(LlmType),
    #[error("Invalid API key format: {0}")] InvalidCredential(String),
    #[error("Request to {provider} failed: {source}")] Http {
        provider: LlmType,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} responded with status {status}")] Status {
        provider: LlmType,
        status: u16,
    },
    #[error("{0} returned an empty completion")] EmptyResponse(LlmType),
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub llm_type: LlmType,
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_type: LlmType::Gemini,
            api_key: None,
            completion_model: None,
            base_url: None,
            temperature: 0.9,
            max_tokens: 150,
            timeout: Duration::from_secs(15),
        }
    }
}

impl LlmConfig {
    /// True when delegation should be attempted at all.
    pub fn is_configured(&self) -> bool {
        !self.llm_type.requires_api_key() ||
            self.api_key.as_deref().map_or(false, |k| !k.trim().is_empty())
    }
}
