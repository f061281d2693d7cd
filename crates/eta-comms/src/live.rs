//! Chat-completion HTTP generator.

use std::time::Duration;

use log::{debug, trace};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use eta_core::CommsSettings;

use crate::request::SYSTEM_PROMPT;
use crate::{CommsError, CommsResult, CommunicationGenerator, MessageRequest};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role:    &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model:       &'a str,
    messages:    [ChatMessage<'a>; 2],
    max_tokens:  u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Calls an OpenAI-compatible `/chat/completions` endpoint.
///
/// Each request is a blocking POST bounded by `timeout_secs`.  Transport
/// errors, non-success status codes and empty completions are all returned
/// as [`CommsError`]; the communicator decides what to do with them.
pub struct LiveGenerator {
    client:      Client,
    url:         String,
    api_key:     String,
    model:       String,
    max_tokens:  u32,
    temperature: f32,
}

impl LiveGenerator {
    /// Fails with [`CommsError::MissingApiKey`] when no non-blank key is set.
    pub fn new(settings: &CommsSettings) -> CommsResult<Self> {
        let api_key = settings.api_key().ok_or(CommsError::MissingApiKey)?.to_owned();
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", settings.endpoint.trim_end_matches('/')),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CommunicationGenerator for LiveGenerator {
    fn generate(&self, request: &MessageRequest<'_>) -> CommsResult<String> {
        let prompt = request.prompt();
        let body = ChatRequest {
            model:       &self.model,
            messages:    [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            max_tokens:  request.max_tokens(self.max_tokens),
            temperature: self.temperature,
        };

        trace!("POST {} ({:?})", self.url, request.kind());
        let resp: ChatResponse = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        debug!("{} choices returned", resp.choices.len());

        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or(CommsError::EmptyResponse)
    }

    fn name(&self) -> &'static str {
        "live"
    }
}
