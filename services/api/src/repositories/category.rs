//! Category repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use market::admin::ValidatedCategory;
use market::models::Category;

const CATEGORY_COLUMNS: &str = "id, name, icon, description, parent_id, created_at";

/// Category repository
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories ordered by name
    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Find a category by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Whether any category is nested under `id`
    pub async fn has_children(&self, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE parent_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Create a new category
    pub async fn create(&self, category: &ValidatedCategory) -> Result<Category> {
        info!("Creating category: {}", category.name);

        let created = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, icon, description, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&category.name)
        .bind(&category.icon)
        .bind(&category.description)
        .bind(category.parent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a category; `None` when it does not exist
    pub async fn update(&self, id: Uuid, category: &ValidatedCategory) -> Result<Option<Category>> {
        info!("Updating category: {}", id);

        let updated = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $2, icon = $3, description = $4, parent_id = $5
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&category.name)
        .bind(&category.icon)
        .bind(&category.description)
        .bind(category.parent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a category; products and children keep existing without it
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting category: {}", id);

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
