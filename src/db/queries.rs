use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::models::metadata::{ImageMetadata, ALT_TEXT_META_KEY, LEGEND_META_KEY};
use crate::services::store::{MetadataStore, SettingsStore, StoreError};

/// PostgreSQL-backed settings and image metadata.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_option(&self, name: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM agent_photo_options WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(r) => Some(r.try_get("value")?),
            None => None,
        })
    }

    async fn set_option(&self, name: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO agent_photo_options (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_option(&self, name: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM agent_photo_options WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl MetadataStore for PgStore {
    async fn update_image_metadata(
        &self,
        image_id: &str,
        alt_text: &str,
        legend: &str,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in [(ALT_TEXT_META_KEY, alt_text), (LEGEND_META_KEY, legend)] {
            sqlx::query(
                r#"
                INSERT INTO image_meta (image_id, meta_key, meta_value)
                VALUES ($1, $2, $3)
                ON CONFLICT (image_id, meta_key)
                DO UPDATE SET meta_value = EXCLUDED.meta_value, updated_at = now()
                "#,
            )
            .bind(image_id)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn image_metadata(&self, image_id: &str) -> Result<Option<ImageMetadata>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT meta_key, meta_value, updated_at
            FROM image_meta
            WHERE image_id = $1 AND meta_key IN ($2, $3)
            "#,
        )
        .bind(image_id)
        .bind(ALT_TEXT_META_KEY)
        .bind(LEGEND_META_KEY)
        .fetch_all(&self.pool)
        .await?;

        let mut alt_text = None;
        let mut legend = None;
        let mut updated_at: Option<DateTime<Utc>> = None;

        for row in rows {
            let key: String = row.try_get("meta_key")?;
            let value: String = row.try_get("meta_value")?;
            let at: DateTime<Utc> = row.try_get("updated_at")?;
            updated_at = Some(updated_at.map_or(at, |prev| prev.max(at)));
            match key.as_str() {
                ALT_TEXT_META_KEY => alt_text = Some(value),
                LEGEND_META_KEY => legend = Some(value),
                _ => {}
            }
        }

        Ok(match (alt_text, legend, updated_at) {
            (Some(alt_text), Some(legend), Some(updated_at)) => Some(ImageMetadata {
                image_id: image_id.to_string(),
                alt_text,
                legend,
                updated_at,
            }),
            _ => None,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
