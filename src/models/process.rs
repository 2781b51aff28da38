use std::fmt;

use garde::Validate;
use serde::{Deserialize, Serialize};

/// Identifier of the image record in the host editor's media library.
///
/// The editor sends numeric attachment ids, but any non-empty string is
/// accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageId {
    Number(u64),
    Text(String),
}

impl ImageId {
    /// `0`, `""` and `"0"` are treated as absent, as the host editor does.
    pub fn is_empty(&self) -> bool {
        match self {
            ImageId::Number(n) => *n == 0,
            ImageId::Text(s) => s.is_empty() || s == "0",
        }
    }
}

impl Default for ImageId {
    fn default() -> Self {
        ImageId::Text(String::new())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageId::Number(n) => write!(f, "{n}"),
            ImageId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ImageId {
    fn from(value: u64) -> Self {
        ImageId::Number(value)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        ImageId::Text(value.to_string())
    }
}

/// Body of `POST /agent-photo/v1/process`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    #[garde(custom(image_id_present))]
    pub image_id: ImageId,

    #[serde(default)]
    #[garde(length(min = 1))]
    pub image_url: String,
}

impl ProcessRequest {
    pub fn new(image_id: impl Into<ImageId>, image_url: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            image_url: image_url.into(),
        }
    }
}

fn image_id_present(value: &ImageId, _ctx: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("image id is empty"));
    }
    Ok(())
}

/// The five fields generated for one image. All of them are present in a
/// successful result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub alt_text: String,
    pub legend: String,
    pub title1: String,
    pub title2: String,
    pub title3: String,
}

impl ProcessResult {
    pub fn titles(&self) -> [&str; 3] {
        [&self.title1, &self.title2, &self.title3]
    }
}

/// Success envelope returned with HTTP 200.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ProcessResult,
}

impl From<ProcessResult> for ProcessResponse {
    fn from(result: ProcessResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

/// Failure envelope shared by every non-2xx response of the relay.
#[derive(Debug, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>, debug: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            debug,
        }
    }
}
