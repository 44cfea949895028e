//! Vendor and invite repository

use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use market::invite::{invite_expiry, new_invite_token};
use market::models::{Vendor, VendorInvite};

/// Vendor repository
#[derive(Clone)]
pub struct VendorRepository {
    pool: PgPool,
}

impl VendorRepository {
    /// Create a new vendor repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Vendors newest-first
    pub async fn list(&self) -> Result<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(
            r#"
            SELECT id, email, business_name, is_verified, created_at
            FROM vendors
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vendors)
    }

    /// Issue an invite with a fresh token, valid for a week
    pub async fn create_invite(&self, email: &str) -> Result<VendorInvite> {
        info!("Inviting vendor: {}", email);

        let invite = sqlx::query_as::<_, VendorInvite>(
            r#"
            INSERT INTO vendor_invites (email, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, email, token, expires_at, created_at
            "#,
        )
        .bind(email)
        .bind(new_invite_token())
        .bind(invite_expiry(Utc::now()))
        .fetch_one(&self.pool)
        .await?;

        Ok(invite)
    }
}
