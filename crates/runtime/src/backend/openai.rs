//! OpenAI-compatible chat completions backend.
//!
//! Targets `POST {base_url}/chat/completions`, the API exposed by OpenAI and
//! by local model servers such as LM Studio.

use super::{Completion, CompletionRequest, CompletionService, Usage};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// LM Studio's default local endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";
/// Local servers ignore the model name but the API requires one.
pub const DEFAULT_MODEL: &str = "local-model";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Builder for creating an OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiBackendBuilder {
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl OpenAiBackendBuilder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bearer token. Local servers accept any value or none.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Per-request timeout. An expired request counts as the service being
    /// unavailable.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenAiBackend> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(OpenAiBackend {
            client,
            endpoint: format!("{}/chat/completions", self.base_url.trim_end_matches('/')),
            model: self.model,
            api_key: self.api_key,
            max_tokens: self.max_tokens,
        })
    }
}

/// OpenAI-compatible chat completions backend.
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: Option<u32>,
}

impl OpenAiBackend {
    pub fn builder(base_url: impl Into<String>, model: impl Into<String>) -> OpenAiBackendBuilder {
        OpenAiBackendBuilder::new(base_url, model)
    }

    /// Backend for a local server on the default port.
    pub fn local() -> Result<Self> {
        Self::builder(DEFAULT_BASE_URL, DEFAULT_MODEL).build()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Display for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "openai({}, endpoint={})", self.model, self.endpoint)
    }
}

impl CompletionService for OpenAiBackend {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion> {
        let api_request = ApiRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        debug!(
            endpoint = %self.endpoint,
            messages = request.messages.len(),
            temperature = request.temperature,
            "sending completion request"
        );

        let mut req = self.client.post(&self.endpoint).json(&api_request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service { status, body });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("response has no choices".into()))?;

        let usage = api_response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        debug!(
            chars = choice.message.content.as_deref().map_or(0, str::len),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "completion received"
        );

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            usage,
        })
    }
}
