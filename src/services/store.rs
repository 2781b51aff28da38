use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::metadata::ImageMetadata;
use crate::services::encryption::EncryptionError;

/// Key/value option storage for relay settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_option(&self, name: &str) -> Result<Option<String>, StoreError>;

    async fn set_option(&self, name: &str, value: &str) -> Result<(), StoreError>;

    async fn delete_option(&self, name: &str) -> Result<(), StoreError>;
}

/// Per-image metadata storage.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Overwrite both fields of an image in one step. Implementations must
    /// never leave only one of them written.
    async fn update_image_metadata(
        &self,
        image_id: &str,
        alt_text: &str,
        legend: &str,
    ) -> Result<(), StoreError>;

    async fn image_metadata(&self, image_id: &str) -> Result<Option<ImageMetadata>, StoreError>;

    /// Connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),
}

/// In-process store used when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    options: RwLock<HashMap<String, String>>,
    images: RwLock<HashMap<String, ImageMetadata>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of images with stored metadata.
    pub async fn image_count(&self) -> usize {
        self.images.read().await.len()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_option(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.options.read().await.get(name).cloned())
    }

    async fn set_option(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.options
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_option(&self, name: &str) -> Result<(), StoreError> {
        self.options.write().await.remove(name);
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn update_image_metadata(
        &self,
        image_id: &str,
        alt_text: &str,
        legend: &str,
    ) -> Result<(), StoreError> {
        self.images.write().await.insert(
            image_id.to_string(),
            ImageMetadata {
                image_id: image_id.to_string(),
                alt_text: alt_text.to_string(),
                legend: legend.to_string(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn image_metadata(&self, image_id: &str) -> Result<Option<ImageMetadata>, StoreError> {
        Ok(self.images.read().await.get(image_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn metadata_is_overwritten_without_history() {
        let store = MemoryStore::new();
        store.update_image_metadata("42", "first", "one").await.unwrap();
        store.update_image_metadata("42", "second", "two").await.unwrap();

        let meta = store.image_metadata("42").await.unwrap().unwrap();
        assert_eq!(meta.alt_text, "second");
        assert_eq!(meta.legend, "two");
        assert_eq!(store.image_count().await, 1);
    }

    #[tokio::test]
    async fn options_can_be_cleared() {
        let store = MemoryStore::new();
        store.set_option("agent_photo_api_key", "x").await.unwrap();
        store.delete_option("agent_photo_api_key").await.unwrap();

        assert!(store.get_option("agent_photo_api_key").await.unwrap().is_none());
    }
}
