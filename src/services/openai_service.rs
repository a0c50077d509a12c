use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fmt;

use crate::models::itinerary::Preferences;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const COMPLETION_MODEL: &str = "gpt-4o-mini";
const MAX_COMPLETION_TOKENS: u32 = 4000;

const SYSTEM_INSTRUCTION: &str = "You are an expert travel planner, creating exciting and \
    efficient itineraries. Provide your response as a JSON array of day objects, without any \
    wrapper object. Each day object should have the structure: {day: number, location: 'City, \
    Country', activities: [{time: 'string', description: 'string'}]}. Do not include any \
    markdown formatting or code blocks.";

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug)]
pub enum OpenAiError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for OpenAiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenAiError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            OpenAiError::HttpError(err) => write!(f, "HTTP error: {}", err),
            OpenAiError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for OpenAiError {}

impl From<reqwest::Error> for OpenAiError {
    fn from(err: reqwest::Error) -> Self {
        OpenAiError::HttpError(err)
    }
}

pub struct OpenAiService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiService {
    pub fn new() -> Result<Self, OpenAiError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAiError::EnvironmentError("OPENAI_API_KEY not set".to_string()))?;

        // Overridable so tests and proxies can point at a local endpoint
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url,
        })
    }

    /// Sends the built prompt to the chat-completion endpoint and returns the
    /// model's raw text. A single call, no retries: any upstream failure
    /// surfaces directly to the handler.
    pub async fn generate_itinerary(&self, prompt: &str) -> Result<String, OpenAiError> {
        let request = ChatCompletionRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: 0.7,
            top_p: 0.9,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OpenAiError::ResponseError(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| OpenAiError::ResponseError(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAiError::ResponseError("No choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        Ok(content)
    }
}

/// Builds the user prompt from the validated request fields. Pure and total.
pub fn build_prompt(
    destinations: &[String],
    days: u32,
    traveler_type: &str,
    preferences: &Preferences,
) -> String {
    format!(
        "Create a {}-day itinerary for a {} traveler visiting {}. \
        Preferences: {}. \
        Provide detailed daily activities and recommendations.",
        days,
        traveler_type,
        destinations.join(", "),
        preferences.enabled().join(", ")
    )
}
