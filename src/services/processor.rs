use std::sync::Arc;
use std::time::Instant;

use garde::Validate;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ProcessError;
use crate::models::process::{ProcessRequest, ProcessResult};
use crate::services::sanitize::sanitize_text_field;
use crate::services::settings::SettingsService;
use crate::services::store::MetadataStore;
use crate::services::vision::VisionClient;

/// The relay core: one validated request, one provider call, one metadata
/// write.
pub struct ImageProcessor {
    settings: Arc<SettingsService>,
    metadata: Arc<dyn MetadataStore>,
    vision: Arc<VisionClient>,
}

impl ImageProcessor {
    pub fn new(
        settings: Arc<SettingsService>,
        metadata: Arc<dyn MetadataStore>,
        vision: Arc<VisionClient>,
    ) -> Self {
        Self {
            settings,
            metadata,
            vision,
        }
    }

    /// Generate and store alt text and legend for one image.
    ///
    /// Metadata is written only after all five fields were validated, so a
    /// failed call leaves the stored image untouched.
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessResult, ProcessError> {
        let outcome = self.run(&request).await;

        let label = match &outcome {
            Ok(_) => "success".to_string(),
            Err(err) => err.kind().to_string(),
        };
        metrics::counter!("agent_photo_process_total", "outcome" => label).increment(1);

        outcome
    }

    async fn run(&self, request: &ProcessRequest) -> Result<ProcessResult, ProcessError> {
        if request.validate().is_err() {
            warn!("Image ID or URL missing from request");
            return Err(ProcessError::MissingInput {
                image_id: serde_json::to_value(&request.image_id).unwrap_or(Value::Null),
                image_url: Value::String(request.image_url.clone()),
            });
        }

        let image_id = request.image_id.to_string();

        let Some(api_key) = self.settings.api_key().await? else {
            warn!(image_id = %image_id, "Provider API key is not configured");
            return Err(ProcessError::MissingApiKey);
        };

        info!(image_id = %image_id, "Requesting image analysis");
        let started = Instant::now();
        let described = self.vision.describe_image(&request.image_url, &api_key).await;
        metrics::histogram!("agent_photo_provider_seconds").record(started.elapsed().as_secs_f64());
        let result = described?;

        self.metadata
            .update_image_metadata(
                &image_id,
                &sanitize_text_field(&result.alt_text),
                &sanitize_text_field(&result.legend),
            )
            .await?;

        info!(image_id = %image_id, "Image metadata updated");
        Ok(result)
    }
}
