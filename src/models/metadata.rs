use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Meta key holding an image's alternative text.
pub const ALT_TEXT_META_KEY: &str = "_wp_attachment_image_alt";

/// Meta key holding the generated legend.
pub const LEGEND_META_KEY: &str = "agent_photo_legend";

/// Stored alt text and legend of one image record. Overwritten on every
/// successful processing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub image_id: String,
    pub alt_text: String,
    pub legend: String,
    pub updated_at: DateTime<Utc>,
}
