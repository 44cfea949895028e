//! Product and product image records

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::MarketError;

/// Primary image used when a listing is saved without any image
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x200?text=Product+Image";

/// Physical condition of a listed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductCondition {
    #[default]
    New,
    Used,
}

impl ProductCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCondition::New => "New",
            ProductCondition::Used => "Used",
        }
    }
}

impl fmt::Display for ProductCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCondition {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "New" | "new" => Ok(ProductCondition::New),
            "Used" | "used" => Ok(ProductCondition::Used),
            other => Err(MarketError::MalformedRow {
                entity: "product",
                detail: format!("unknown condition '{}'", other),
            }),
        }
    }
}

impl TryFrom<String> for ProductCondition {
    type Error = MarketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Product listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub location: String,
    pub image_url: String,
    pub category_id: Option<Uuid>,
    #[sqlx(try_from = "String")]
    pub condition: ProductCondition,
    pub warranty: bool,
    pub warranty_period: Option<String>,
    pub features: Option<String>,
    pub contact_phone: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        if self.title.to_lowercase().contains(needle) {
            return true;
        }

        self.description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Image row attached to a product
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
}
