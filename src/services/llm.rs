use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use url::Url;

use crate::core::config::Config;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    pub const CHAPTER: GenerationParams = GenerationParams {
        temperature: 0.7,
        max_output_tokens: 16000,
    };
    pub const SUMMARY: GenerationParams = GenerationParams {
        temperature: 0.3,
        max_output_tokens: 500,
    };
    pub const PLANNING: GenerationParams = GenerationParams {
        temperature: 0.3,
        max_output_tokens: 8000,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn extension(&self) -> &'static str {
        if self.mime_type.contains("png") {
            "png"
        } else {
            "jpg"
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// `Ok(None)` when the model answered without an image.
    async fn generate_image(&self, _prompt: &str) -> Result<Option<ImagePayload>> {
        Err(anyhow!("This provider cannot generate images"))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub gemini: Option<GeminiConfig>,
    pub openai: Option<OpenAIConfig>,
    pub ollama: Option<OllamaConfig>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gemini: None,
            openai: None,
            ollama: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Falls back to `GEMINI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_image_model")]
    pub image_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            image_model: default_gemini_image_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_gemini_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_gemini_image_model() -> String {
    "gemini-3-pro-image-preview".to_string()
}
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/".to_string()
}

/// Config value first, then the environment. Blank keys count as missing.
pub fn resolve_api_key(configured: Option<&str>, env: Option<String>) -> Result<String> {
    configured
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .or(env.filter(|k| !k.trim().is_empty()))
        .with_context(|| format!("{} environment variable not set", GEMINI_API_KEY_ENV))
}

pub fn create_llm(config: &Config) -> Result<Box<dyn LlmClient>> {
    match config.llm.provider.as_str() {
        "gemini" => {
            let cfg = config.llm.gemini.clone().unwrap_or_default();
            let api_key = resolve_api_key(
                cfg.api_key.as_deref(),
                std::env::var(GEMINI_API_KEY_ENV).ok(),
            )?;
            Ok(Box::new(GeminiClient::new(&api_key, &cfg)?))
        }
        "ollama" => {
            let cfg = config.llm.ollama.as_ref().context("Ollama config missing")?;
            Ok(Box::new(OllamaClient::new(&cfg.base_url, &cfg.model)))
        }
        "openai" => {
            let cfg = config.llm.openai.as_ref().context("OpenAI config missing")?;
            Ok(Box::new(OpenAIClient::new(
                &cfg.api_key,
                &cfg.model,
                cfg.base_url.as_deref(),
            )))
        }
        _ => Err(anyhow!("Unknown LLM provider: {}", config.llm.provider)),
    }
}

// --- Gemini ---
#[derive(Debug)]
struct GeminiClient {
    api_key: String,
    model: String,
    image_model: String,
    base_url: Url,
    client: reqwest::Client,
}

impl GeminiClient {
    fn new(api_key: &str, cfg: &GeminiConfig) -> Result<Self> {
        let mut base = cfg.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            api_key: api_key.to_string(),
            model: cfg.model.clone(),
            image_model: cfg.image_model.clone(),
            base_url: Url::parse(&base).context("Invalid Gemini base_url")?,
            client: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, model: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", model))?)
    }

    async fn generate(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
        let resp = self
            .client
            .post(self.endpoint(model)?)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await?;
            return Err(anyhow!("Gemini API error: {}", error_text));
        }

        let response_text = resp.text().await?;
        let result: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
            anyhow!("Failed to parse Gemini response: {}. Body: {}", e, response_text)
        })?;

        if let Some(err) = &result.error {
            return Err(anyhow!("Gemini API returned error: {}", err.message));
        }
        Ok(result)
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

impl GeminiRequest {
    fn user(prompt: &str, generation_config: GeminiGenerationConfig) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        }
    }
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    response_modalities: Vec<String>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
struct GeminiInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize, Debug)]
struct GeminiError {
    message: String,
}

impl GeminiResponse {
    fn first_candidate(&self) -> Result<&GeminiCandidate> {
        self.candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| anyhow!("Gemini response has no candidates"))
    }

    /// All text parts of the first candidate, concatenated.
    fn text(&self) -> Result<String> {
        let candidate = self.first_candidate()?;
        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("UNKNOWN");
            bail!("Gemini response empty. Finish reason: {}", reason);
        }
        Ok(text)
    }

    fn image(&self) -> Result<Option<ImagePayload>> {
        let candidate = self.first_candidate()?;
        let inline = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.inline_data.as_ref());

        match inline {
            Some(data) => Ok(Some(ImagePayload {
                data: STANDARD
                    .decode(&data.data)
                    .context("Gemini image payload is not valid base64")?,
                mime_type: data.mime_type.clone(),
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let request = GeminiRequest::user(
            prompt,
            GeminiGenerationConfig {
                temperature: Some(params.temperature),
                max_output_tokens: Some(params.max_output_tokens),
                ..Default::default()
            },
        );
        self.generate(&self.model, &request).await?.text()
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<ImagePayload>> {
        let request = GeminiRequest::user(
            prompt,
            GeminiGenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
                ..Default::default()
            },
        );
        self.generate(&self.image_model, &request).await?.image()
    }
}

// --- Ollama ---
#[derive(Debug)]
struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaClient {
    fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn user(content: &str) -> Vec<Self> {
        vec![ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        }]
    }
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaMessageResponse,
}

#[derive(Deserialize)]
struct OllamaMessageResponse {
    content: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request_body = OllamaRequest {
            model: self.model.clone(),
            messages: ChatMessage::user(prompt),
            stream: false,
            options: OllamaOptions {
                temperature: params.temperature,
                num_predict: params.max_output_tokens,
            },
        };

        let resp = self.client.post(&url).json(&request_body).send().await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await?;
            return Err(anyhow!("Ollama API error: {}", error_text));
        }

        let result: OllamaResponse = resp.json().await?;
        Ok(result.message.content)
    }
}

// --- OpenAI ---

#[derive(Debug)]
struct OpenAIClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    fn new(api_key: &str, model: &str, base_url: Option<&str>) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url
                .unwrap_or("https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessageResponse,
}

#[derive(Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = OpenAIRequest {
            model: self.model.clone(),
            messages: ChatMessage::user(prompt),
            temperature: params.temperature,
            max_tokens: params.max_output_tokens,
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await?;
            return Err(anyhow!("OpenAI API error: {}", error_text));
        }

        let result: OpenAIResponse = resp.json().await?;
        result
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("OpenAI response empty or missing content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_response_parsing_safety_block() {
        let json = r#"{
            "candidates": [
                {
                    "finishReason": "SAFETY",
                    "index": 0
                }
            ]
        }"#;

        let result: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = result.text().unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_gemini_response_joins_text_parts() {
        let json = r##"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            { "text": "# Title\n" },
                            { "text": "Body" }
                        ],
                        "role": "model"
                    },
                    "finishReason": "STOP",
                    "index": 0
                }
            ]
        }"##;

        let result: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(result.text().unwrap(), "# Title\nBody");
    }

    #[test]
    fn test_gemini_response_image_part() {
        let json = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            { "text": "Here is your figure" },
                            { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                        ]
                    }
                }
            ]
        }"#;

        let result: GeminiResponse = serde_json::from_str(json).unwrap();
        let image = result.image().unwrap().unwrap();
        assert_eq!(image.data, b"hello");
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn test_gemini_response_without_image() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": "no image"}]}}]}"#;
        let result: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(result.image().unwrap().is_none());
    }

    #[test]
    fn test_gemini_request_shape() {
        let request = GeminiRequest::user(
            "hi",
            GeminiGenerationConfig {
                temperature: Some(0.3),
                max_output_tokens: Some(500),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 500);
        assert!(value["generationConfig"].get("responseModalities").is_none());
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_gemini_endpoint() {
        let client = GeminiClient::new("k", &GeminiConfig::default()).unwrap();
        assert_eq!(
            client.endpoint("gemini-3-flash-preview").unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_resolve_api_key() {
        assert_eq!(resolve_api_key(Some("cfg"), Some("env".into())).unwrap(), "cfg");
        assert_eq!(resolve_api_key(None, Some("env".into())).unwrap(), "env");
        assert!(resolve_api_key(None, None).is_err());
        assert!(resolve_api_key(Some("  "), None).is_err());
        assert_eq!(resolve_api_key(Some(""), Some("env".into())).unwrap(), "env");
    }

    #[test]
    fn test_create_llm_rejects_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "mystery".to_string();
        assert!(create_llm(&config).is_err());

        config.llm.provider = "openai".to_string();
        assert!(create_llm(&config).is_err());
    }

    #[test]
    fn test_ollama_request_shape() {
        let request = OllamaRequest {
            model: "qwen3".to_string(),
            messages: ChatMessage::user("hi"),
            stream: false,
            options: OllamaOptions {
                temperature: GenerationParams::SUMMARY.temperature,
                num_predict: GenerationParams::SUMMARY.max_output_tokens,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "qwen3");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_predict"], 500);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_ollama_response_parsing() {
        let json = r#"{
            "model": "qwen3",
            "message": { "role": "assistant", "content": "Chapter text" },
            "done": true
        }"#;
        let result: OllamaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(result.message.content, "Chapter text");
    }

    #[test]
    fn test_create_llm_ollama() {
        let mut config = Config::default();
        config.llm.provider = "ollama".to_string();
        config.llm.ollama = Some(OllamaConfig {
            base_url: "http://localhost:11434/".to_string(),
            model: "qwen3".to_string(),
        });
        assert!(create_llm(&config).is_ok());
    }

    #[tokio::test]
    async fn test_text_only_providers_reject_image_requests() {
        let ollama = OllamaClient::new("http://localhost:11434", "qwen3");
        let err = ollama.generate_image("a diagram").await.unwrap_err();
        assert!(err.to_string().contains("cannot generate images"));

        let openai = OpenAIClient::new("k", "gpt-4o", None);
        assert!(openai.generate_image("a diagram").await.is_err());
        assert_eq!(openai.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_openai_request_shape() {
        let request = OpenAIRequest {
            model: "gpt-4o".to_string(),
            messages: ChatMessage::user("hi"),
            temperature: GenerationParams::CHAPTER.temperature,
            max_tokens: GenerationParams::CHAPTER.max_output_tokens,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["max_tokens"], 16000);
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_openai_response_parsing_success() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello there"
                },
                "finish_reason": "stop"
            }]
        }"#;

        let result: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert_eq!(result.choices[0].message.content.as_deref(), Some("Hello there"));
    }
}
