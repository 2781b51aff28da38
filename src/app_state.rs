use std::sync::Arc;

use crate::services::{
    auth::SessionVerifier,
    encryption::SecretBox,
    processor::ImageProcessor,
    settings::SettingsService,
    store::{MetadataStore, SettingsStore},
    vision::VisionClient,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<ImageProcessor>,
    pub settings: Arc<SettingsService>,
    pub metadata: Arc<dyn MetadataStore>,
    pub sessions: Arc<SessionVerifier>,
}

impl AppState {
    pub fn new(
        settings_store: Arc<dyn SettingsStore>,
        metadata: Arc<dyn MetadataStore>,
        secrets: SecretBox,
        vision: VisionClient,
        sessions: SessionVerifier,
    ) -> Self {
        let settings = Arc::new(SettingsService::new(settings_store, secrets));
        let processor = Arc::new(ImageProcessor::new(
            settings.clone(),
            metadata.clone(),
            Arc::new(vision),
        ));

        Self {
            processor,
            settings,
            metadata,
            sessions: Arc::new(sessions),
        }
    }
}
