//! Support request record

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::MarketError;

/// Triage status of a support request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportStatus {
    #[default]
    New,
    InProgress,
    Closed,
}

impl SupportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStatus::New => "new",
            SupportStatus::InProgress => "in_progress",
            SupportStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for SupportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportStatus {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(SupportStatus::New),
            "in_progress" => Ok(SupportStatus::InProgress),
            "closed" => Ok(SupportStatus::Closed),
            other => Err(MarketError::MalformedRow {
                entity: "support_request",
                detail: format!("unknown status '{}'", other),
            }),
        }
    }
}

// NULL status in the table means the request was never triaged.
impl TryFrom<Option<String>> for SupportStatus {
    type Error = MarketError;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        match value {
            Some(s) => s.parse(),
            None => Ok(SupportStatus::New),
        }
    }
}

/// Message sent through the public support form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct SupportRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub category: Option<String>,
    pub message: String,
    #[sqlx(try_from = "Option<String>")]
    pub status: SupportStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_decodes_as_new() {
        assert_eq!(SupportStatus::try_from(None).unwrap(), SupportStatus::New);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = SupportStatus::try_from(Some("archived".to_string())).unwrap_err();
        assert!(matches!(err, MarketError::MalformedRow { .. }));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SupportStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
