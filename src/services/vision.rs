use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ProcessError;
use crate::models::process::ProcessResult;

/// Chat-completion model used for every call.
pub const VISION_MODEL: &str = "gpt-4o";

pub const SAMPLING_TEMPERATURE: f64 = 1.2;

pub const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Keys the model must return, in the order they are checked.
pub const REQUIRED_KEYS: [&str; 5] = ["altText", "legend", "title1", "title2", "title3"];

const USER_INSTRUCTION: &str =
    "Please analyze this image and provide your response in JSON format as instructed.";

/// System instruction sent with every request.
pub const SYSTEM_PROMPT: &str = r#"You are Agent Photo, an assistant designed for black and white street photography analysis.

Upon receiving a photo upload, automatically provide the following:

1) **ALT text description**: Focus on accuracy and conciseness for screen reader accessibility. Highlight key elements and the overall feel of the image.

2) **Reflective legend**: Craft a poetic narrative that captures the scene's essence, considering mood, setting, and subjects.

3) **Creative title options**: Generate three title suggestions that reflect the photo's themes and subjects.

Your expertise is in interpreting street scenes with an emphasis on mood, setting, and subjects. In cases where a photo deviates from this specialty, such as color photos or non-street scenes, strive to adapt and offer service based on available content.

Avoid requesting additional details or clarification; rely solely on the visual content of the uploaded photo.

# Output Format

Provide output as a JSON containing a list of key/value pairs with the following keys:

- "altText": [A concise ALT text description.]
- "legend": [A brief and engaging reflective legend.]
- "title1": [First creative title option.]
- "title2": [Second creative title option.]
- "title3": [Third creative title option.]

# Notes

- Focus on retaining the unique aspects of street photography, particularly mood and ambiance.
- Adapt responses for non-black and white or non-street photos as best as possible."#;

/// Client for a vision-capable chat-completion endpoint.
pub struct VisionClient {
    http: Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl VisionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Ask the model for alt text, legend and titles of the image at `image_url`.
    ///
    /// One request, no retry. Transport failures, non-2xx statuses and
    /// malformed payloads all end the call.
    pub async fn describe_image(
        &self,
        image_url: &str,
        api_key: &str,
    ) -> Result<ProcessResult, ProcessError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&completion_request(image_url))
            .send()
            .await
            .map_err(ProcessError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ProcessError::Transport)?;

        tracing::debug!(status = status.as_u16(), body = %body, "Provider response received");

        if !status.is_success() {
            return Err(ProcessError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// JSON body of the chat-completion request for one image.
pub fn completion_request(image_url: &str) -> Value {
    json!({
        "model": VISION_MODEL,
        "messages": [
            {
                "role": "system",
                "content": SYSTEM_PROMPT
            },
            {
                "role": "user",
                "content": [
                    {"type": "text", "text": USER_INSTRUCTION},
                    {"type": "image_url", "image_url": {"url": image_url, "detail": "high"}}
                ]
            }
        ],
        "response_format": {"type": "json_object"},
        "temperature": SAMPLING_TEMPERATURE,
        "max_tokens": MAX_OUTPUT_TOKENS
    })
}

/// Extract the five generated fields from a chat-completion body.
///
/// Checks run in order and the first failure wins: the envelope must carry
/// non-empty message content, that content must be JSON, and every key of
/// [`REQUIRED_KEYS`] must be present and non-null.
pub fn parse_completion(body: &str) -> Result<ProcessResult, ProcessError> {
    let envelope: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|_| ProcessError::InvalidResponse)?;

    let content = envelope
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or(ProcessError::InvalidResponse)?;

    let data: Value = serde_json::from_str(&content).map_err(ProcessError::JsonParse)?;

    let field = |key: &'static str| -> Result<String, ProcessError> {
        match data.get(key) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(value.to_string()),
            _ => Err(ProcessError::MissingKey(key)),
        }
    };

    Ok(ProcessResult {
        alt_text: field(REQUIRED_KEYS[0])?,
        legend: field(REQUIRED_KEYS[1])?,
        title1: field(REQUIRED_KEYS[2])?,
        title2: field(REQUIRED_KEYS[3])?,
        title3: field(REQUIRED_KEYS[4])?,
    })
}
