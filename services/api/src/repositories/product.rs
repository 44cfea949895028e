//! Product repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use market::draft::ProductInput;
use market::models::{Product, ProductImage};
use market::store::ProductStore;

const PRODUCT_COLUMNS: &str = "id, title, description, price, location, image_url, category_id, \
     condition, warranty, warranty_period, features, contact_phone, created_by, created_at";

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Products newest-first, restricted to a category when one is given
    pub async fn list(&self, category_id: Option<Uuid>) -> Result<Vec<Product>> {
        info!("Listing products for category {:?}", category_id);

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::uuid IS NULL OR category_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Products sharing a category, newest-first, without `exclude`
    pub async fn related(&self, category_id: Uuid, exclude: Uuid) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE category_id = $1 AND id <> $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(category_id)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Delete a product; its image rows go with it
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        images: &[String],
    ) -> Result<()> {
        if images.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO product_images (product_id, image_url, position)
            SELECT $1, url, ord - 1
            FROM UNNEST($2::text[]) WITH ORDINALITY AS t(url, ord)
            "#,
        )
        .bind(product_id)
        .bind(images)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn create_product(&self, product: &ProductInput, images: &[String]) -> Result<Product> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (title, description, price, location, image_url, category_id,
                                  condition, warranty, warranty_period, features, contact_phone,
                                  created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.location)
        .bind(&product.image_url)
        .bind(product.category_id)
        .bind(product.condition.as_str())
        .bind(product.warranty)
        .bind(&product.warranty_period)
        .bind(&product.features)
        .bind(&product.contact_phone)
        .bind(product.created_by)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_images(&mut tx, created.id, images).await?;

        tx.commit().await?;
        info!("Created product {} with {} images", created.id, images.len());

        Ok(created)
    }

    async fn update_product(
        &self,
        id: Uuid,
        product: &ProductInput,
        images: &[String],
    ) -> Result<Option<Product>> {
        let mut tx = self.pool.begin().await?;

        // The original author of a listing is kept on edit.
        let updated = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET title = $2, description = $3, price = $4, location = $5, image_url = $6,
                category_id = $7, condition = $8, warranty = $9, warranty_period = $10,
                features = $11, contact_phone = $12
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.location)
        .bind(&product.image_url)
        .bind(product.category_id)
        .bind(product.condition.as_str())
        .bind(product.warranty)
        .bind(&product.warranty_period)
        .bind(&product.features)
        .bind(&product.contact_phone)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_images(&mut tx, id, images).await?;

        tx.commit().await?;
        info!("Updated product {} with {} images", id, images.len());

        Ok(Some(updated))
    }

    async fn images_for(&self, product_id: Uuid) -> Result<Vec<ProductImage>> {
        let images = sqlx::query_as::<_, ProductImage>(
            r#"
            SELECT id, product_id, image_url
            FROM product_images
            WHERE product_id = $1
            ORDER BY position, id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }
}
