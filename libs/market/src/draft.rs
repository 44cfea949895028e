//! Three-step product form.
//!
//! A [`ProductDraft`] moves linearly through Basics → Details → Media. Only
//! leaving Basics is gated by required fields, and only the Media step can
//! be submitted. Submitting turns the draft into a [`ProductSubmission`],
//! which is what the repository persists.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{MarketError, MarketResult};
use crate::models::{PLACEHOLDER_IMAGE_URL, Product, ProductCondition, ProductImage};

/// Step of the product form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    #[default]
    Basics,
    Details,
    Media,
}

impl FormStep {
    pub fn number(&self) -> u8 {
        match self {
            FormStep::Basics => 1,
            FormStep::Details => 2,
            FormStep::Media => 3,
        }
    }

    fn next(self) -> Option<FormStep> {
        match self {
            FormStep::Basics => Some(FormStep::Details),
            FormStep::Details => Some(FormStep::Media),
            FormStep::Media => None,
        }
    }

    fn prev(self) -> Option<FormStep> {
        match self {
            FormStep::Basics => None,
            FormStep::Details => Some(FormStep::Basics),
            FormStep::Media => Some(FormStep::Details),
        }
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormStep::Basics => "Basics",
            FormStep::Details => "Details",
            FormStep::Media => "Media",
        };
        write!(f, "{} ({})", self.number(), label)
    }
}

/// Whether the draft creates a new listing or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "product_id", rename_all = "snake_case")]
pub enum DraftMode {
    #[default]
    Create,
    Edit(Uuid),
}

/// Raw form fields, kept as typed in until submit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category_id: Option<Uuid>,
    pub location: String,
    pub contact_phone: String,
    pub condition: ProductCondition,
    pub warranty: bool,
    pub warranty_period: String,
    pub features: String,
}

/// Partial update of [`ProductFields`]; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    /// `null` clears the category, absence keeps it
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<Uuid>>,
    pub location: Option<String>,
    pub contact_phone: Option<String>,
    pub condition: Option<ProductCondition>,
    pub warranty: Option<bool>,
    pub warranty_period: Option<String>,
    pub features: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProductFields {
    fn apply(&mut self, patch: FieldsPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.category_id {
            self.category_id = v;
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = patch.contact_phone {
            self.contact_phone = v;
        }
        if let Some(v) = patch.condition {
            self.condition = v;
        }
        if let Some(v) = patch.warranty {
            self.warranty = v;
        }
        if let Some(v) = patch.warranty_period {
            self.warranty_period = v;
        }
        if let Some(v) = patch.features {
            self.features = v;
        }
    }
}

/// Parse a price as typed into the form.
///
/// Blank, non-numeric and negative values are rejected; the result is
/// rounded to cents.
pub fn parse_price(raw: &str) -> MarketResult<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MarketError::validation("Price is required"));
    }

    let price = Decimal::from_str(raw)
        .map_err(|_| MarketError::validation("Price must be a valid number"))?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(MarketError::validation("Price must not be negative"));
    }

    Ok(price.round_dp(2))
}

/// Ordered list of image URLs; the first one is the listing's main image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageList(Vec<String>);

impl ImageList {
    /// Build from stored rows, skipping blanks and repeated URLs
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = ImageList::default();
        for url in urls {
            // Stored data may contain blanks or repeats; drop them quietly.
            let _ = list.add(url.as_ref());
        }
        list
    }

    /// Append a URL. Blank input and exact duplicates leave the list unchanged.
    pub fn add(&mut self, raw: &str) -> MarketResult<()> {
        let url = raw.trim();
        if url.is_empty() {
            return Err(MarketError::validation("Please enter a valid image URL"));
        }

        if self.0.iter().any(|u| u == url) {
            return Err(MarketError::validation("This URL is already added"));
        }

        self.0.push(url.to_string());
        Ok(())
    }

    /// Remove the URL at `index`, if any
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validated column values for a product row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub location: String,
    pub image_url: String,
    pub category_id: Option<Uuid>,
    pub condition: ProductCondition,
    pub warranty: bool,
    pub warranty_period: Option<String>,
    pub features: Option<String>,
    pub contact_phone: Option<String>,
    pub created_by: Option<Uuid>,
}

/// What a submitted draft asks the repository to do
#[derive(Debug, Clone, PartialEq)]
pub enum ProductSubmission {
    Create {
        product: ProductInput,
        images: Vec<String>,
    },
    /// Overwrite the product and replace its whole image set with `images`
    Update {
        id: Uuid,
        product: ProductInput,
        images: Vec<String>,
    },
}

impl ProductSubmission {
    pub fn images(&self) -> &[String] {
        match self {
            ProductSubmission::Create { images, .. } | ProductSubmission::Update { images, .. } => {
                images
            }
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Product being created or edited in the back-office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub id: Uuid,
    pub mode: DraftMode,
    pub step: FormStep,
    pub fields: ProductFields,
    pub images: ImageList,
    /// Main image of the product being edited, kept when the list is emptied
    pub previous_image_url: Option<String>,
    pub created_by: Option<Uuid>,
}

impl ProductDraft {
    /// Empty draft for a new listing
    pub fn new(created_by: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode: DraftMode::Create,
            step: FormStep::Basics,
            fields: ProductFields::default(),
            images: ImageList::default(),
            previous_image_url: None,
            created_by,
        }
    }

    /// Draft pre-loaded from an existing product and its image rows
    pub fn for_edit(product: &Product, images: &[ProductImage]) -> Self {
        let fields = ProductFields {
            title: product.title.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            category_id: product.category_id,
            location: product.location.clone(),
            contact_phone: product.contact_phone.clone().unwrap_or_default(),
            condition: product.condition,
            warranty: product.warranty,
            warranty_period: product.warranty_period.clone().unwrap_or_default(),
            features: product.features.clone().unwrap_or_default(),
        };

        Self {
            id: Uuid::new_v4(),
            mode: DraftMode::Edit(product.id),
            step: FormStep::Basics,
            fields,
            images: ImageList::from_urls(images.iter().map(|i| i.image_url.as_str())),
            previous_image_url: Some(product.image_url.clone()),
            created_by: product.created_by,
        }
    }

    pub fn apply(&mut self, patch: FieldsPatch) {
        self.fields.apply(patch);
    }

    pub fn add_image(&mut self, url: &str) -> MarketResult<()> {
        self.images.add(url)
    }

    pub fn remove_image(&mut self, index: usize) -> MarketResult<String> {
        self.images
            .remove(index)
            .ok_or_else(|| MarketError::validation(format!("No image at position {}", index)))
    }

    fn validate_basics(&self) -> MarketResult<Decimal> {
        if self.fields.title.trim().is_empty() {
            return Err(MarketError::validation("Title is required"));
        }

        let price = parse_price(&self.fields.price)?;

        if self.fields.location.trim().is_empty() {
            return Err(MarketError::validation("Location is required"));
        }

        Ok(price)
    }

    /// Move one step forward
    pub fn advance(&mut self) -> MarketResult<FormStep> {
        let next = self.step.next().ok_or(MarketError::InvalidTransition {
            action: "advance",
            step: self.step,
        })?;

        if self.step == FormStep::Basics {
            self.validate_basics()?;
        }

        self.step = next;
        Ok(next)
    }

    /// Move one step back
    pub fn back(&mut self) -> MarketResult<FormStep> {
        let prev = self.step.prev().ok_or(MarketError::InvalidTransition {
            action: "go back",
            step: self.step,
        })?;

        self.step = prev;
        Ok(prev)
    }

    /// Turn the draft into a create or update request
    pub fn submit(&self) -> MarketResult<ProductSubmission> {
        if self.step != FormStep::Media {
            return Err(MarketError::InvalidTransition {
                action: "submit",
                step: self.step,
            });
        }

        let price = self.validate_basics()?;

        let image_url = self
            .images
            .primary()
            .map(str::to_string)
            .or_else(|| self.previous_image_url.clone())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

        let fields = &self.fields;
        let product = ProductInput {
            title: fields.title.trim().to_string(),
            description: non_blank(&fields.description),
            price,
            location: fields.location.trim().to_string(),
            image_url,
            category_id: fields.category_id,
            condition: fields.condition,
            warranty: fields.warranty,
            warranty_period: fields
                .warranty
                .then(|| non_blank(&fields.warranty_period))
                .flatten(),
            features: non_blank(&fields.features),
            contact_phone: non_blank(&fields.contact_phone),
            created_by: self.created_by,
        };

        let images = self.images.as_slice().to_vec();

        Ok(match self.mode {
            DraftMode::Create => ProductSubmission::Create { product, images },
            DraftMode::Edit(id) => ProductSubmission::Update {
                id,
                product,
                images,
            },
        })
    }
}
