//! Support request repository

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use market::models::{SupportRequest, SupportStatus};
use market::support::NewSupportRequest;

const SUPPORT_COLUMNS: &str = "id, name, email, category, message, status, created_at";

/// Support request repository
#[derive(Clone)]
pub struct SupportRepository {
    pool: PgPool,
}

impl SupportRepository {
    /// Create a new support repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a request from the public form; it starts as `new`
    pub async fn create(&self, request: &NewSupportRequest) -> Result<SupportRequest> {
        info!("Storing support request from {}", request.email);

        let created = sqlx::query_as::<_, SupportRequest>(&format!(
            r#"
            INSERT INTO support_requests (name, email, category, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUPPORT_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.category)
        .bind(&request.message)
        .bind(SupportStatus::New.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Requests newest-first
    pub async fn list(&self) -> Result<Vec<SupportRequest>> {
        let requests = sqlx::query_as::<_, SupportRequest>(&format!(
            "SELECT {SUPPORT_COLUMNS} FROM support_requests ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Set the status of a request; `None` when it does not exist
    pub async fn update_status(
        &self,
        id: Uuid,
        status: SupportStatus,
    ) -> Result<Option<SupportRequest>> {
        info!("Setting support request {} to {}", id, status);

        let updated = sqlx::query_as::<_, SupportRequest>(&format!(
            r#"
            UPDATE support_requests
            SET status = $2
            WHERE id = $1
            RETURNING {SUPPORT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
