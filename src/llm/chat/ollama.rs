use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::HeaderMap };
use serde::{ Deserialize, Serialize };
use std::time::Duration;
use log::debug;

use super::{ build_http, non_empty, send_json, ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmError, LlmType };

#[derive(Debug)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    completion_model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

impl OllamaClient {
    pub fn new(
        base_url: Option<String>,
        completion_model: Option<String>,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration
    ) -> Result<Self, LlmError> {
        let model = completion_model.unwrap_or_else(|| "llama3".to_string());
        let url = base_url.unwrap_or_else(|| "http://localhost:11434".into());

        Ok(Self {
            http: build_http(LlmType::Ollama, timeout, HeaderMap::new())?,
            base_url: url,
            completion_model: model,
            temperature,
            max_tokens,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::new(
            config.base_url.clone(),
            config.completion_model.clone(),
            config.temperature,
            config.max_tokens,
            config.timeout
        )
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        debug!("Sending Ollama request to {}", url);

        let req = GenerateRequest {
            model: self.completion_model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };
        let data: GenerateResponse = send_json(LlmType::Ollama, self.http.post(&url).json(&req)).await?;

        non_empty(LlmType::Ollama, Some(data.response))
    }

    fn get_model(&self) -> String {
        self.completion_model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }

    fn get_llm_type(&self) -> LlmType {
        LlmType::Ollama
    }
}
