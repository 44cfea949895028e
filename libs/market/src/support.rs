//! Public support form, triage filter and notification text

use serde::Deserialize;

use crate::error::{MarketError, MarketResult};
use crate::models::{SupportRequest, SupportStatus};

/// Message returned when the public form is missing its required fields
pub const MISSING_FIELDS_MESSAGE: &str = "Email and message are required";

/// Support form as posted by a visitor; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupportSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub message: Option<String>,
}

/// Column values for a new `support_requests` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupportRequest {
    pub name: Option<String>,
    pub email: String,
    pub category: Option<String>,
    pub message: String,
}

fn filled(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl SupportSubmission {
    pub fn validate(&self) -> MarketResult<NewSupportRequest> {
        let (Some(email), Some(message)) = (filled(&self.email), filled(&self.message)) else {
            return Err(MarketError::validation(MISSING_FIELDS_MESSAGE));
        };

        Ok(NewSupportRequest {
            name: filled(&self.name),
            email,
            category: filled(&self.category),
            message,
        })
    }
}

impl NewSupportRequest {
    pub fn notification_subject(&self) -> String {
        format!(
            "[AgriBuyX Support] {} from {}",
            self.category.as_deref().unwrap_or("New message"),
            self.email
        )
    }

    pub fn notification_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nTopic: {}\n\n{}",
            self.name.as_deref().unwrap_or("-"),
            self.email,
            self.category.as_deref().unwrap_or("-"),
            self.message
        )
    }
}

/// Status filter on the back-office support list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    New,
    InProgress,
    Closed,
}

impl StatusFilter {
    pub fn matches(&self, status: SupportStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::New => status == SupportStatus::New,
            StatusFilter::InProgress => status == SupportStatus::InProgress,
            StatusFilter::Closed => status == SupportStatus::Closed,
        }
    }

    pub fn apply(&self, requests: Vec<SupportRequest>) -> Vec<SupportRequest> {
        requests.into_iter().filter(|r| self.matches(r.status)).collect()
    }
}

/// Body of a status change
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusUpdate {
    pub status: SupportStatus,
}
