use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered vendor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vendor {
    pub id: Uuid,
    pub email: String,
    pub business_name: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Pending invitation for a prospective vendor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VendorInvite {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
