//! Persistence seam for submitted product drafts

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::draft::{ProductDraft, ProductInput, ProductSubmission};
use crate::error::MarketError;
use crate::models::{Product, ProductImage};

/// Storage for products and their image rows.
///
/// Both writes are all-or-nothing: the product row and its image rows are
/// committed together or not at all.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a product and one image row per URL
    async fn create_product(
        &self,
        product: &ProductInput,
        images: &[String],
    ) -> anyhow::Result<Product>;

    /// Overwrite a product and replace its whole image set.
    ///
    /// Returns `None` when no product has this id.
    async fn update_product(
        &self,
        id: Uuid,
        product: &ProductInput,
        images: &[String],
    ) -> anyhow::Result<Option<Product>>;

    /// Image rows of a product
    async fn images_for(&self, product_id: Uuid) -> anyhow::Result<Vec<ProductImage>>;
}

/// Why a draft could not be saved
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The draft itself is not submittable
    #[error(transparent)]
    Invalid(#[from] MarketError),

    /// The edited product no longer exists
    #[error("Product not found")]
    NotFound,

    /// The store rejected the write; carries the store's own message
    #[error("Error {action} product: {message}")]
    Backend {
        action: &'static str,
        message: String,
    },
}

/// Validate a draft and write it through `store`
pub async fn submit_draft<S>(store: &S, draft: &ProductDraft) -> Result<Product, SubmitError>
where
    S: ProductStore + ?Sized,
{
    match draft.submit()? {
        ProductSubmission::Create { product, images } => {
            info!("Creating product '{}' with {} images", product.title, images.len());
            store
                .create_product(&product, &images)
                .await
                .map_err(|e| {
                    error!("Failed to create product: {}", e);
                    SubmitError::Backend {
                        action: "creating",
                        message: e.to_string(),
                    }
                })
        }
        ProductSubmission::Update {
            id,
            product,
            images,
        } => {
            info!("Updating product {} with {} images", id, images.len());
            store
                .update_product(id, &product, &images)
                .await
                .map_err(|e| {
                    error!("Failed to update product {}: {}", id, e);
                    SubmitError::Backend {
                        action: "updating",
                        message: e.to_string(),
                    }
                })?
                .ok_or(SubmitError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::FieldsPatch;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// Store kept in memory, with a switch to make every write fail
    #[derive(Default)]
    struct MemoryStore {
        products: Mutex<HashMap<Uuid, Product>>,
        images: Mutex<Vec<ProductImage>>,
        fail_writes: bool,
    }

    fn to_product(id: Uuid, input: &ProductInput) -> Product {
        Product {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            price: input.price,
            location: input.location.clone(),
            image_url: input.image_url.clone(),
            category_id: input.category_id,
            condition: input.condition,
            warranty: input.warranty,
            warranty_period: input.warranty_period.clone(),
            features: input.features.clone(),
            contact_phone: input.contact_phone.clone(),
            created_by: input.created_by,
            created_at: Utc::now(),
        }
    }

    fn image_rows(product_id: Uuid, urls: &[String]) -> Vec<ProductImage> {
        urls.iter()
            .map(|url| ProductImage {
                id: Uuid::new_v4(),
                product_id,
                image_url: url.clone(),
            })
            .collect()
    }

    #[async_trait]
    impl ProductStore for MemoryStore {
        async fn create_product(
            &self,
            input: &ProductInput,
            images: &[String],
        ) -> anyhow::Result<Product> {
            if self.fail_writes {
                anyhow::bail!("connection refused");
            }

            let product = to_product(Uuid::new_v4(), input);
            self.products.lock().await.insert(product.id, product.clone());
            self.images
                .lock()
                .await
                .extend(image_rows(product.id, images));
            Ok(product)
        }

        async fn update_product(
            &self,
            id: Uuid,
            input: &ProductInput,
            images: &[String],
        ) -> anyhow::Result<Option<Product>> {
            if self.fail_writes {
                anyhow::bail!("connection refused");
            }

            let mut products = self.products.lock().await;
            if !products.contains_key(&id) {
                return Ok(None);
            }

            let product = to_product(id, input);
            products.insert(id, product.clone());

            let mut rows = self.images.lock().await;
            rows.retain(|row| row.product_id != id);
            rows.extend(image_rows(id, images));
            Ok(Some(product))
        }

        async fn images_for(&self, product_id: Uuid) -> anyhow::Result<Vec<ProductImage>> {
            Ok(self
                .images
                .lock()
                .await
                .iter()
                .filter(|row| row.product_id == product_id)
                .cloned()
                .collect())
        }
    }

    fn ready_draft() -> ProductDraft {
        let mut draft = ProductDraft::new(None);
        draft.apply(FieldsPatch {
            title: Some("Cocoa beans".to_string()),
            price: Some("120".to_string()),
            location: Some("Koforidua".to_string()),
            ..Default::default()
        });
        draft
    }

    fn to_media(draft: &mut ProductDraft) {
        draft.advance().unwrap();
        draft.advance().unwrap();
    }

    #[tokio::test]
    async fn edit_replaces_the_full_image_set() {
        let store = MemoryStore::default();

        let mut draft = ready_draft();
        draft.add_image("https://cdn.example.com/A.jpg").unwrap();
        draft.add_image("https://cdn.example.com/B.jpg").unwrap();
        to_media(&mut draft);
        let created = submit_draft(&store, &draft).await.unwrap();
        assert_eq!(store.images_for(created.id).await.unwrap().len(), 2);

        let rows = store.images_for(created.id).await.unwrap();
        let mut edit = ProductDraft::for_edit(&created, &rows);
        edit.remove_image(0).unwrap();
        edit.remove_image(0).unwrap();
        edit.add_image("https://cdn.example.com/C.jpg").unwrap();
        to_media(&mut edit);

        let updated = submit_draft(&store, &edit).await.unwrap();
        let urls: Vec<String> = store
            .images_for(created.id)
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.image_url)
            .collect();

        assert_eq!(urls, vec!["https://cdn.example.com/C.jpg"]);
        assert_eq!(updated.image_url, "https://cdn.example.com/C.jpg");
    }

    #[tokio::test]
    async fn backend_error_keeps_raw_message() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };

        let mut draft = ready_draft();
        to_media(&mut draft);
        let err = submit_draft(&store, &draft).await.unwrap_err();

        assert_eq!(err.to_string(), "Error creating product: connection refused");
        assert!(store.products.lock().await.is_empty());
    }

    #[tokio::test]
    async fn draft_before_media_is_not_written() {
        let store = MemoryStore::default();
        let draft = ready_draft();

        let err = submit_draft(&store, &draft).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Invalid(MarketError::InvalidTransition { .. })
        ));
        assert!(store.products.lock().await.is_empty());
    }

    #[tokio::test]
    async fn editing_a_deleted_product_is_not_found() {
        let store = MemoryStore::default();
        let mut draft = ready_draft();
        draft.mode = crate::draft::DraftMode::Edit(Uuid::new_v4());
        to_media(&mut draft);

        let err = submit_draft(&store, &draft).await.unwrap_err();
        assert!(matches!(err, SubmitError::NotFound));
    }
}
