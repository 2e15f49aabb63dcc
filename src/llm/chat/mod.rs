pub mod gemini;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use reqwest::{ Client as HttpClient, RequestBuilder, header::HeaderMap };
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use super::{ LlmConfig, LlmError, LlmType };
use self::gemini::GeminiChatClient;
use self::ollama::OllamaClient;
use self::openai::OpenAIChatClient;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
    fn get_llm_type(&self) -> LlmType;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Gemini => {
            let specific_client = GeminiChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI => {
            let specific_client = OpenAIChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

/// Builds the reqwest client every adapter uses. The timeout bounds the whole
/// request, connect included.
pub(crate) fn build_http(
    provider: LlmType,
    timeout: Duration,
    headers: HeaderMap
) -> Result<HttpClient, LlmError> {
    HttpClient::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|source| LlmError::Http { provider, source })
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: LlmType,
    request: RequestBuilder
) -> Result<T, LlmError> {
    let resp = request.send().await.map_err(|source| LlmError::Http { provider, source })?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LlmError::Status { provider, status: status.as_u16() });
    }
    resp.json::<T>().await.map_err(|source| LlmError::Http { provider, source })
}

pub(crate) fn non_empty(
    provider: LlmType,
    text: Option<String>
) -> Result<CompletionResponse, LlmError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(CompletionResponse { response: t }),
        _ => Err(LlmError::EmptyResponse(provider)),
    }
}
