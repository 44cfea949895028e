//! Back-office inputs for categories and vendor invites

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{MarketError, MarketResult};
use crate::models::Category;
use crate::validation::{optional, required, validate_email};

/// Category as submitted from the back-office
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// Column values for a `categories` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCategory {
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

impl CategoryInput {
    /// Validate against the looked-up parent row.
    ///
    /// `own_id` is set when updating an existing category; `parent` is the
    /// row for `parent_id`, or `None` when it does not exist.
    pub fn validate(
        &self,
        own_id: Option<Uuid>,
        parent: Option<&Category>,
    ) -> MarketResult<ValidatedCategory> {
        let name = required(&self.name, "Name")?;

        if let Some(parent_id) = self.parent_id {
            if own_id == Some(parent_id) {
                return Err(MarketError::validation(
                    "A category cannot be its own parent",
                ));
            }

            let parent = parent
                .filter(|p| p.id == parent_id)
                .ok_or_else(|| MarketError::validation("Parent category not found"))?;

            // Only one level of nesting.
            if !parent.is_top_level() {
                return Err(MarketError::validation(
                    "Parent category must be a top-level category",
                ));
            }
        }

        Ok(ValidatedCategory {
            name,
            icon: optional(self.icon.as_deref()),
            description: optional(self.description.as_deref()),
            parent_id: self.parent_id,
        })
    }
}

/// Invite request for a prospective vendor
#[derive(Debug, Clone, Deserialize)]
pub struct InviteRequest {
    #[serde(default)]
    pub email: String,
}

impl InviteRequest {
    /// Normalized email of the invitee
    pub fn validate(&self) -> MarketResult<String> {
        let email = self.email.trim().to_lowercase();
        validate_email(&email)?;
        Ok(email)
    }
}
