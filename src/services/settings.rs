use std::sync::Arc;

use crate::models::settings::API_KEY_OPTION;
use crate::services::encryption::SecretBox;
use crate::services::sanitize::sanitize_text_field;
use crate::services::store::{SettingsStore, StoreError};

/// Access to the provider API key. Every read goes to the store.
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    secrets: SecretBox,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>, secrets: SecretBox) -> Self {
        Self { store, secrets }
    }

    /// The stored API key, or `None` when unset or empty.
    pub async fn api_key(&self) -> Result<Option<String>, StoreError> {
        let Some(sealed) = self.store.get_option(API_KEY_OPTION).await? else {
            return Ok(None);
        };
        let key = self.secrets.open(&sealed)?;
        Ok(Some(key).filter(|k| !k.is_empty()))
    }

    /// Store a new key. The value is sanitized as plain text first; an
    /// empty result clears the setting.
    pub async fn set_api_key(&self, raw: &str) -> Result<bool, StoreError> {
        let key = sanitize_text_field(raw);
        if key.is_empty() {
            self.store.delete_option(API_KEY_OPTION).await?;
            tracing::info!("Provider API key cleared");
            return Ok(false);
        }

        let sealed = self.secrets.seal(&key)?;
        self.store.set_option(API_KEY_OPTION, &sealed).await?;
        tracing::info!("Provider API key updated");
        Ok(true)
    }

    /// Store `raw` only when no key is configured yet.
    pub async fn seed_api_key(&self, raw: &str) -> Result<(), StoreError> {
        if self.api_key().await?.is_none() {
            self.set_api_key(raw).await?;
        }
        Ok(())
    }
}
