use async_trait::async_trait;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE } };
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::time::Duration;
use log::debug;

use super::{ build_http, non_empty, send_json, ChatClient, CompletionResponse };
use crate::llm::{ LlmConfig, LlmError, LlmType };

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
    }
}

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl fmt::Debug for GeminiChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiChatClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration
    ) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = build_http(LlmType::Gemini, timeout, headers)?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature,
            max_tokens,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingCredential(LlmType::Gemini))?;

        Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
            config.temperature,
            config.max_tokens,
            config.timeout
        )
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        debug!("Sending Gemini request to {}", url);

        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        };

        let resp: GeminiResponse = send_json(
            LlmType::Gemini,
            self.http.post(&url).query(&[("key", self.api_key.as_str())]).json(&req)
        ).await?;

        non_empty(LlmType::Gemini, resp.into_text())
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }

    fn get_llm_type(&self) -> LlmType {
        LlmType::Gemini
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{ extract::Query, http::StatusCode, routing::post, Json, Router };
    use serde_json::{ json, Value };
    use std::collections::HashMap;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn echo(
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>
    ) -> Json<Value> {
        let text = format!(
            "key={} max={} temp={} prompt={}",
            query.get("key").cloned().unwrap_or_default(),
            body["generationConfig"]["maxOutputTokens"],
            body["generationConfig"]["temperature"],
            body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default()
        );
        Json(json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }))
    }

    fn client(base_url: String) -> GeminiChatClient {
        GeminiChatClient::new(
            "test-key".into(),
            None,
            Some(base_url),
            0.5,
            150,
            Duration::from_secs(5)
        ).unwrap()
    }

    #[tokio::test]
    async fn sends_prompt_and_reads_first_candidate() {
        let base = serve(Router::new().route("/v1beta/models/{*rest}", post(echo))).await;
        let resp = client(base).complete("hello maggie").await.unwrap();
        assert_eq!(resp.response, "key=test-key max=150 temp=0.5 prompt=hello maggie");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/v1beta/models/{*rest}",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") })
        );
        let base = serve(app).await;
        let err = client(base).complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Status { provider: LlmType::Gemini, status: 500 }));
    }

    #[tokio::test]
    async fn missing_candidates_is_an_empty_response() {
        let app = Router::new().route(
            "/v1beta/models/{*rest}",
            post(|| async { Json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })) })
        );
        let base = serve(app).await;
        let err = client(base).complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(LlmType::Gemini)));
    }

    #[tokio::test]
    async fn unreachable_host_is_an_http_error() {
        let err = client("http://127.0.0.1:1".into()).complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::Http { .. }));
    }

    #[test]
    fn from_config_rejects_blank_key() {
        let config = LlmConfig { api_key: Some(" ".into()), ..LlmConfig::default() };
        assert!(matches!(
            GeminiChatClient::from_config(&config),
            Err(LlmError::MissingCredential(LlmType::Gemini))
        ));
    }
}
