//! OpenAI-compatible chat-completions client: bounded timeout, one retry on
//! transient failures, provider errors normalized to [`GatewayError`].
//!
//! Non-streaming: one POST to `{base_url}/chat/completions` per attempt with
//! the prompt as a single user message. Retries exactly once on a network
//! error or 5xx; never on 4xx (repeating a rejected request repeats the
//! rejection) and never after a timeout (the deadline is already spent).
//! Error messages carry the HTTP status only, never the response body or the
//! credential.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::ModelClient;
use crate::error::GatewayError;

/// Connection settings for [`OpenAiModel`].
#[derive(Debug, Clone)]
pub struct OpenAiOptions {
    /// Provider base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model name sent in the request body.
    pub model: String,
    /// Deadline for one attempt (request + response body).
    pub timeout: Duration,
}

impl Default for OpenAiOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Real model client for OpenAI-compatible providers.
pub struct OpenAiModel {
    http: reqwest::Client,
    api_key: String,
    options: OpenAiOptions,
}

/// Attempt outcome classification: transient failures are worth one retry,
/// fatal ones are not.
enum Attempt {
    Transient(GatewayError),
    Fatal(GatewayError),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatRequestMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiModel {
    pub fn new(api_key: impl Into<String>, options: OpenAiOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            options,
        }
    }

    /// One attempt under the configured deadline.
    async fn try_complete(&self, prompt: &str) -> Result<String, Attempt> {
        match timeout(self.options.timeout, self.exchange(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(Attempt::Fatal(GatewayError::Timeout)),
        }
    }

    async fn exchange(&self, prompt: &str) -> Result<String, Attempt> {
        let url = format!(
            "{}/chat/completions",
            self.options.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.options.model,
            messages: [ChatRequestMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // The reqwest error can embed the URL; keep it in logs only.
                debug!(error = %e, "model request failed to send");
                Attempt::Transient(GatewayError::Upstream(
                    "could not reach the model provider".to_string(),
                ))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Attempt::Fatal(GatewayError::Auth));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Attempt::Fatal(GatewayError::RateLimited));
        }
        if status.is_server_error() {
            return Err(Attempt::Transient(GatewayError::Upstream(format!(
                "upstream returned status {status}"
            ))));
        }
        if !status.is_success() {
            // Other 4xx: retrying would repeat the same rejection.
            return Err(Attempt::Fatal(GatewayError::Upstream(format!(
                "upstream returned status {status}"
            ))));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            debug!(error = %e, "model response body was not a completion payload");
            Attempt::Fatal(GatewayError::Upstream(
                "upstream returned a malformed completion payload".to_string(),
            ))
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Attempt::Fatal(GatewayError::Upstream(
                "upstream returned an empty completion".to_string(),
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl ModelClient for OpenAiModel {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let mut last_transient: Option<GatewayError> = None;
        for attempt in 0..2u8 {
            match self.try_complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(Attempt::Fatal(err)) => return Err(err),
                Err(Attempt::Transient(err)) => {
                    warn!(attempt, error = %err, "transient upstream failure");
                    last_transient = Some(err);
                }
            }
        }
        Err(last_transient
            .unwrap_or_else(|| GatewayError::Upstream("upstream call failed".to_string())))
    }
}
