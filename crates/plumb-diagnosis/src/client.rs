//! OpenAI-compatible chat-completions client.

use std::future::Future;
use std::time::Duration;

use plumb_config::OpenAiConfig;
use plumb_prompt::{ChatMessage, PromptDocument, ResponseFormat};
use serde::{Deserialize, Serialize};

use crate::error::DiagnosisError;
use crate::http::check_response;

/// External reasoning service: instruction document in, text out.
///
/// For documents whose response format is JSON, the returned text is the raw
/// JSON. Callers validate its shape.
pub trait DiagnosisClient {
    /// Send `document` and return the model's reply.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosisError::MissingCredential`] before any I/O when no
    /// credential is available, otherwise transport/status errors.
    fn complete(
        &self,
        document: &PromptDocument,
    ) -> impl Future<Output = Result<String, DiagnosisError>> + Send;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireFormat>,
}

#[derive(Serialize)]
struct WireFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Build a client from config. The credential is not checked here so a
    /// key typed in later can be installed with [`Self::set_api_key`].
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosisError::Http`] if the underlying client fails to
    /// build.
    pub fn new(config: OpenAiConfig) -> Result<Self, DiagnosisError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("plumb/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, document: &PromptDocument) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: document.messages(),
            max_tokens: self.config.max_tokens,
            response_format: match document.response_format {
                ResponseFormat::JsonObject => Some(WireFormat {
                    kind: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        }
    }
}

impl DiagnosisClient for OpenAiClient {
    async fn complete(&self, document: &PromptDocument) -> Result<String, DiagnosisError> {
        if !self.config.is_configured() {
            tracing::warn!("diagnosis requested without an API key; not calling the service");
            return Err(DiagnosisError::MissingCredential);
        }

        let body = self.request_body(document);
        tracing::debug!(
            model = %self.config.model,
            has_image = document.has_image(),
            json = document.wants_json(),
            "sending chat completion"
        );

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(self.config.api_key.trim())
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let data: ChatResponse = resp.json().await?;
        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(DiagnosisError::EmptyResponse)
    }
}
