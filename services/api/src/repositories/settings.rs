//! Site settings repository

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use market::models::SiteSetting;
use market::settings::{SOCIAL_KEYS, SocialLinks};

/// Site settings repository
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Create a new settings repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read the social link keys; other settings are not loaded
    pub async fn social_links(&self) -> Result<SocialLinks> {
        let rows = sqlx::query_as::<_, SiteSetting>(
            "SELECT key, value FROM site_settings WHERE key = ANY($1)",
        )
        .bind(&SOCIAL_KEYS[..])
        .fetch_all(&self.pool)
        .await?;

        Ok(SocialLinks::from_settings(&rows))
    }

    /// Upsert the three social link keys in one statement
    pub async fn save_social_links(&self, links: &SocialLinks) -> Result<SocialLinks> {
        let rows = links.to_settings();
        info!("Saving {} site settings", rows.len());

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO site_settings (key, value) ");
        builder.push_values(&rows, |mut b, row| {
            b.push_bind(row.key.clone()).push_bind(row.value.clone());
        });
        builder.push(" ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()");

        builder.build().execute(&self.pool).await?;

        Ok(SocialLinks::from_settings(&rows))
    }
}
