//! Product detail view with its "related by category" strip

use serde::Serialize;

use crate::catalog::RevealWindow;
use crate::models::{Category, Product, ProductImage};

/// Related products shown before the first "show more"
pub const RELATED_INITIAL_VISIBLE: usize = 4;
/// Related products added by each "show more"
pub const RELATED_VISIBLE_STEP: usize = 4;

/// Everything the product page renders
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Option<Category>,
    /// Image rows, or the main image alone when the product has none
    pub gallery: Vec<String>,
    pub related: Vec<Product>,
    pub related_total: usize,
    pub related_next_visible: Option<usize>,
}

impl ProductDetail {
    pub fn assemble(
        product: Product,
        category: Option<Category>,
        images: Vec<ProductImage>,
        related: Vec<Product>,
        related_visible: Option<usize>,
    ) -> Self {
        let mut gallery: Vec<String> = images
            .into_iter()
            .map(|i| i.image_url)
            .filter(|u| !u.trim().is_empty())
            .collect();
        if gallery.is_empty() {
            gallery.push(product.image_url.clone());
        }

        // The base product never appears in its own related strip.
        let related: Vec<Product> = related.into_iter().filter(|p| p.id != product.id).collect();

        let window = RevealWindow::new(
            related_visible.unwrap_or(RELATED_INITIAL_VISIBLE),
            RELATED_VISIBLE_STEP,
        );
        let related_total = related.len();
        let related_next_visible = window.next(related_total);
        let related = window.slice(&related).to_vec();

        ProductDetail {
            product,
            category,
            gallery,
            related,
            related_total,
            related_next_visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCondition;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn product(title: &str, category_id: Option<Uuid>) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            price: Decimal::ONE,
            location: "Ho".to_string(),
            image_url: format!("https://cdn.example.com/{}.jpg", title),
            category_id,
            condition: ProductCondition::New,
            warranty: false,
            warranty_period: None,
            features: None,
            contact_phone: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn gallery_falls_back_to_main_image() {
        let p = product("cassava", None);
        let detail = ProductDetail::assemble(p, None, vec![], vec![], None);
        assert_eq!(detail.gallery, vec!["https://cdn.example.com/cassava.jpg"]);
        assert_eq!(detail.related_total, 0);
        assert_eq!(detail.related_next_visible, None);
    }

    #[test]
    fn related_is_revealed_four_at_a_time_without_the_base_product() {
        let category = Some(Uuid::new_v4());
        let base = product("base", category);
        let mut related: Vec<Product> = (0..9).map(|i| product(&format!("r{}", i), category)).collect();
        related.insert(3, base.clone());

        let detail = ProductDetail::assemble(base.clone(), None, vec![], related.clone(), None);
        assert_eq!(detail.related_total, 9);
        assert_eq!(detail.related.len(), 4);
        assert_eq!(detail.related_next_visible, Some(8));
        assert!(detail.related.iter().all(|p| p.id != base.id));

        let detail = ProductDetail::assemble(base, None, vec![], related, Some(8));
        assert_eq!(detail.related.len(), 8);
        assert_eq!(detail.related_next_visible, Some(9));
    }
}
