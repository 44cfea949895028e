//! API models for query strings and request payloads

use serde::Deserialize;
use uuid::Uuid;

use market::catalog::{CatalogFilter, Viewport};
use market::support::StatusFilter;

/// Query string of the storefront catalog
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub location: Option<String>,
    /// Current size of the "load more" window
    pub visible: Option<usize>,
}

impl ProductQuery {
    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter {
            category_id: self.category_id,
            search: self.search.clone(),
            location: self.location.clone(),
        }
    }
}

/// Query string of the product page
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub related_visible: Option<usize>,
}

/// Query string of the category sidebar
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub search: Option<String>,
}

/// Sidebar click on a category
#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    #[serde(default)]
    pub viewport: Viewport,
}

/// Opens a draft; with `product_id` the draft edits that product
#[derive(Debug, Default, Deserialize)]
pub struct StartDraftRequest {
    pub product_id: Option<Uuid>,
}

/// Image URL to append to a draft
#[derive(Debug, Deserialize)]
pub struct AddImageRequest {
    #[serde(default)]
    pub url: String,
}

/// Query string of the back-office support list
#[derive(Debug, Default, Deserialize)]
pub struct SupportQuery {
    #[serde(default)]
    pub status: StatusFilter,
}
