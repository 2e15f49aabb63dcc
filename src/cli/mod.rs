use clap::Parser;
use std::time::Duration;
use crate::llm::{ LlmConfig, LlmType };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider used to answer chat messages (gemini, openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "gemini")]
    pub chat_llm_type: LlmType,

    /// API Key for the chat LLM provider. Leave empty to answer from the local rules only.
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Base URL for the chat LLM provider API
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// Model name for chat completion (e.g., gemini-1.5-flash, gpt-4o-mini, llama3)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Sampling temperature sent to the provider
    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.9")]
    pub chat_temperature: f32,

    /// Upper bound on generated tokens per reply
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "150")]
    pub chat_max_tokens: u32,

    /// Seconds to wait for the provider before falling back to the local rules
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value = "15")]
    pub chat_timeout_secs: u64,

    // --- Menu Args ---
    /// Optional JSON file replacing the built-in menu catalog
    #[arg(long, env = "MENU_PATH")]
    pub menu_path: Option<String>,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:5000")]
    pub server_addr: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    pub fn llm_config(&self) -> LlmConfig {
        let api_key = if !self.chat_api_key.trim().is_empty() {
            Some(self.chat_api_key.clone())
        } else {
            None
        };
        LlmConfig {
            llm_type: self.chat_llm_type,
            api_key,
            completion_model: self.chat_model.clone(),
            base_url: self.chat_base_url.clone(),
            temperature: self.chat_temperature,
            max_tokens: self.chat_max_tokens,
            timeout: Duration::from_secs(self.chat_timeout_secs),
        }
    }
}
