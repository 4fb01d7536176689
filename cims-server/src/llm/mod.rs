//! Chat-completion client for the support assistant
//!
//! Any OpenAI-compatible endpoint works; the default is Groq.

pub mod prompts;

use async_trait::async_trait;
use cims_core::config::LlmSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DIAGNOSIS_TEMPERATURE: f32 = 0.3;
const GUIDE_MAX_TOKENS: u32 = 350;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM returned no choices")]
    EmptyResponse,

    #[error("LLM returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One completion call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Ask the model for a single JSON object
    pub json_object: bool,
}

/// Anything that can answer a chat request with the assistant's text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

/// Client for `POST {base_url}/chat/completions`
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiCompatClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            model: settings.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletion for OpenAiCompatClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        #[derive(Serialize)]
        struct ResponseFormat {
            #[serde(rename = "type")]
            kind: &'static str,
        }

        #[derive(Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
            temperature: f32,
            #[serde(skip_serializing_if = "Option::is_none")]
            max_tokens: Option<u32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            response_format: Option<ResponseFormat>,
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: Option<String>,
        }

        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages: &request.messages,
                temperature: request.temperature,
                max_tokens: request.max_tokens,
                response_format: request
                    .json_object
                    .then_some(ResponseFormat { kind: "json_object" }),
            })
            .send()
            .await?
            .error_for_status()?
            .json::<CompletionResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Ask for a diagnosis of a reported fault; the model's JSON object is
/// returned as-is.
pub async fn diagnose(
    llm: &dyn ChatCompletion,
    descripcion: &str,
    activo_modelo: Option<&str>,
) -> Result<Value, LlmError> {
    let content = llm
        .complete(ChatRequest {
            messages: vec![
                ChatMessage::system(prompts::DIAGNOSIS_SYSTEM),
                ChatMessage::user(prompts::diagnosis_user(descripcion, activo_modelo)),
            ],
            temperature: DIAGNOSIS_TEMPERATURE,
            max_tokens: None,
            json_object: true,
        })
        .await?;
    Ok(serde_json::from_str(&content)?)
}

/// Answer a question about using the application.
pub async fn guide_reply(llm: &dyn ChatCompletion, mensaje: &str) -> Result<String, LlmError> {
    llm.complete(ChatRequest {
        messages: vec![
            ChatMessage::system(prompts::GUIDE_SYSTEM),
            ChatMessage::user(mensaje),
        ],
        temperature: DIAGNOSIS_TEMPERATURE,
        max_tokens: Some(GUIDE_MAX_TOKENS),
        json_object: false,
    })
    .await
}
