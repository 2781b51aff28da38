use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::process::ProcessRequest;

/// Generated fields as received by the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReply {
    /// Absent only if the relay broke its own contract.
    pub alt_text: Option<String>,
    pub legend: String,
    pub titles: [String; 3],
}

#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn process(&self, request: &ProcessRequest) -> Result<RelayReply, RelayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("Relay returned an incomplete result")]
    Incomplete,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayEnvelope {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    alt_text: Option<String>,
    legend: Option<String>,
    title1: Option<String>,
    title2: Option<String>,
    title3: Option<String>,
}

impl RelayEnvelope {
    fn into_reply(self) -> Result<RelayReply, RelayError> {
        if !self.success {
            return Err(RelayError::Rejected(
                self.message.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        match (self.legend, self.title1, self.title2, self.title3) {
            (Some(legend), Some(t1), Some(t2), Some(t3)) => Ok(RelayReply {
                alt_text: self.alt_text,
                legend,
                titles: [t1, t2, t3],
            }),
            _ => Err(RelayError::Incomplete),
        }
    }
}

/// Calls the relay's process endpoint with the editor's session token.
pub struct HttpRelayClient {
    http: Client,
    endpoint: String,
    session_token: String,
}

impl HttpRelayClient {
    /// `rest_root` is the host editor's REST base, e.g. `https://site/wp-json/`.
    pub fn new(rest_root: &str, session_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}/agent-photo/v1/process", rest_root.trim_end_matches('/')),
            session_token: session_token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn process(&self, request: &ProcessRequest) -> Result<RelayReply, RelayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.session_token)
            .json(request)
            .send()
            .await?;

        tracing::debug!(status = response.status().as_u16(), "Relay responded");

        // Failure envelopes arrive with 4xx statuses; the body decides.
        let envelope: RelayEnvelope = response.json().await?;
        envelope.into_reply()
    }
}
