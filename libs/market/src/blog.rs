//! Blog-style updates: slug derivation, post validation and video embeds

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::models::BlogPost;

/// Derive a URL slug from a title.
///
/// Lowercases, drops everything except `a-z`, `0-9`, whitespace and `-`,
/// trims, and joins whitespace runs with `-`. Returns `None` when nothing
/// usable is left.
pub fn slugify(title: &str) -> Option<String> {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();

    let strip = STRIP.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").expect("Failed to compile slug regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

    let lowered = title.to_lowercase();
    let stripped = strip.replace_all(&lowered, "");
    let slug = spaces.replace_all(stripped.trim(), "-");

    (!slug.is_empty()).then(|| slug.into_owned())
}

/// Post as submitted from the back-office
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostInput {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub video_url: String,
}

/// Column values for a `blog_posts` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl BlogPostInput {
    pub fn validate(&self) -> MarketResult<ValidatedPost> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(MarketError::validation("Title is required"));
        }

        let slug = match self.slug.trim() {
            "" => slugify(title),
            given => Some(given.to_string()),
        }
        .ok_or_else(|| MarketError::validation("Slug could not be generated"))?;

        Ok(ValidatedPost {
            title: title.to_string(),
            slug,
            summary: optional(&self.summary),
            content: optional(&self.content),
            image_url: optional(&self.image_url),
            video_url: optional(&self.video_url),
        })
    }
}

/// Embeddable form of a post's video link.
///
/// YouTube watch and short links become embed URLs, direct `.mp4` and
/// `.webm` files are used as-is, anything else is not embedded.
pub fn embed_video_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if url.contains("youtube.com") || url.contains("youtu.be") {
        return Some(
            url.replace("watch?v=", "embed/")
                .replace("youtu.be/", "www.youtube.com/embed/"),
        );
    }

    let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
    if path.ends_with(".mp4") || path.ends_with(".webm") {
        return Some(url.to_string());
    }

    None
}

/// Post as served by the storefront
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostView {
    #[serde(flatten)]
    pub post: BlogPost,
    pub embed_video_url: Option<String>,
}

impl From<BlogPost> for BlogPostView {
    fn from(post: BlogPost) -> Self {
        let embed_video_url = post.video_url.as_deref().and_then(embed_video_url);
        Self {
            post,
            embed_video_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_title() {
        assert_eq!(
            slugify("Maize Prices!! This Week").as_deref(),
            Some("maize-prices-this-week")
        );
        assert_eq!(slugify("  Cocoa   season -- update ").as_deref(), Some("cocoa-season----update"));
        assert_eq!(slugify("2024 Harvest").as_deref(), Some("2024-harvest"));
    }

    #[test]
    fn title_without_usable_characters_has_no_slug() {
        assert_eq!(slugify("!!!"), None);
        assert_eq!(slugify("   "), None);
    }

    #[test]
    fn validation_rejects_empty_slug() {
        let input = BlogPostInput {
            title: "!!!".to_string(),
            ..Default::default()
        };
        assert_eq!(
            input.validate(),
            Err(MarketError::validation("Slug could not be generated"))
        );
    }

    #[test]
    fn validation_requires_title() {
        let input = BlogPostInput {
            title: "   ".to_string(),
            slug: "manual".to_string(),
            ..Default::default()
        };
        assert_eq!(input.validate(), Err(MarketError::validation("Title is required")));
    }

    #[test]
    fn supplied_slug_wins_over_title() {
        let input = BlogPostInput {
            title: "Maize Prices".to_string(),
            slug: " custom-slug ".to_string(),
            summary: "  ".to_string(),
            ..Default::default()
        };
        let post = input.validate().unwrap();
        assert_eq!(post.slug, "custom-slug");
        assert_eq!(post.summary, None);
    }

    #[test]
    fn youtube_links_become_embeds() {
        assert_eq!(
            embed_video_url("https://www.youtube.com/watch?v=abc123").as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
        assert_eq!(
            embed_video_url("https://youtu.be/abc123").as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
        assert_eq!(
            embed_video_url("https://cdn.example.com/clip.MP4?x=1").as_deref(),
            Some("https://cdn.example.com/clip.MP4?x=1")
        );
        assert_eq!(embed_video_url("https://vimeo.com/1234"), None);
    }
}
