use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Generic key/value site setting
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct SiteSetting {
    pub key: String,
    pub value: Option<String>,
}
