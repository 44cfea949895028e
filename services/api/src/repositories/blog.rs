//! Blog post ("updates") repository

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use market::blog::ValidatedPost;
use market::models::BlogPost;

const POST_COLUMNS: &str = "id, title, slug, summary, content, image_url, video_url, created_at";

/// Blog post repository
#[derive(Clone)]
pub struct BlogRepository {
    pool: PgPool,
}

impl BlogRepository {
    /// Create a new blog repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Posts newest-first
    pub async fn list(&self) -> Result<Vec<BlogPost>> {
        let posts = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Find a post by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Create a new post
    pub async fn create(&self, post: &ValidatedPost) -> Result<BlogPost> {
        info!("Creating post: {}", post.slug);

        let created = sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            INSERT INTO blog_posts (title, slug, summary, content, image_url, video_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.summary)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a post; `None` when it does not exist
    pub async fn update(&self, id: Uuid, post: &ValidatedPost) -> Result<Option<BlogPost>> {
        info!("Updating post: {}", id);

        let updated = sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            UPDATE blog_posts
            SET title = $2, slug = $3, summary = $4, content = $5, image_url = $6, video_url = $7
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.summary)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a post
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting post: {}", id);

        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
