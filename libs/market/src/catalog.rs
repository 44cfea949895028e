//! Storefront catalog: product filtering, facets, category tree and the
//! "load more" window.
//!
//! The category filter is pushed down to the database. Location and search
//! text are applied here, over the list the database returned, so a single
//! fetch serves every keystroke of the search box.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Category, Product};

/// Products shown before the first "load more"
pub const CATALOG_INITIAL_VISIBLE: usize = 12;
/// Products added by each "load more"
pub const CATALOG_VISIBLE_STEP: usize = 12;

/// Storefront product filter
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub location: Option<String>,
}

impl CatalogFilter {
    /// Lowercased search text, or `None` when the box is blank
    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    fn matches_category(&self, product: &Product) -> bool {
        match self.category_id {
            Some(id) => product.category_id == Some(id),
            None => true,
        }
    }

    /// Whether a single product passes every active filter
    pub fn matches(&self, product: &Product) -> bool {
        if !self.matches_category(product) {
            return false;
        }

        if let Some(location) = self.location() {
            if product.location.trim() != location {
                return false;
            }
        }

        match self.search_needle() {
            Some(needle) => product.matches_text(&needle),
            None => true,
        }
    }

    /// Filter a fetched list, keeping its order
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self.search_needle();
        let location = self.location();

        products
            .iter()
            .filter(|p| self.matches_category(p))
            .filter(|p| location.is_none_or(|l| p.location.trim() == l))
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_text(n)))
            .collect()
    }

    /// Distinct locations among the products in the selected category.
    ///
    /// Location and search filters are not applied here.
    pub fn location_facets(&self, products: &[Product]) -> Vec<String> {
        products
            .iter()
            .filter(|p| self.matches_category(p))
            .map(|p| p.location.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Incremental reveal over an already fetched list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealWindow {
    visible: usize,
    step: usize,
}

impl RevealWindow {
    pub fn new(visible: usize, step: usize) -> Self {
        Self {
            visible: visible.max(1),
            step: step.max(1),
        }
    }

    /// Window for the storefront catalog, starting from a requested size
    pub fn catalog(requested: Option<usize>) -> Self {
        Self::new(
            requested.unwrap_or(CATALOG_INITIAL_VISIBLE),
            CATALOG_VISIBLE_STEP,
        )
    }

    /// Number of items actually shown for a list of `total`
    pub fn shown(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    /// Visible count after one more "load more", if anything is left
    pub fn next(&self, total: usize) -> Option<usize> {
        if self.visible >= total {
            None
        } else {
            Some((self.visible + self.step).min(total))
        }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.shown(items.len())]
    }
}

/// One page of storefront results
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub total: usize,
    pub visible: usize,
    pub next_visible: Option<usize>,
    pub locations: Vec<String>,
}

impl CatalogPage {
    /// Build the page shown for `filter` from the products fetched for its
    /// category
    pub fn build(fetched: &[Product], filter: &CatalogFilter, window: RevealWindow) -> Self {
        let locations = filter.location_facets(fetched);
        let matching = filter.apply(fetched);
        let total = matching.len();

        let products = window
            .slice(&matching)
            .iter()
            .map(|p| (*p).clone())
            .collect();

        CatalogPage {
            products,
            total,
            visible: window.shown(total),
            next_visible: window.next(total),
            locations,
        }
    }
}

/// Case-insensitive search over category name and description
pub fn search_categories<'a>(categories: &'a [Category], search: &str) -> Vec<&'a Category> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return categories.iter().collect();
    }

    categories.iter().filter(|c| c.matches_text(&needle)).collect()
}

/// Screen width class reported by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewport {
    Narrow,
    #[default]
    Wide,
}

/// Outcome of clicking a category in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "category_id", rename_all = "snake_case")]
pub enum CategorySelection {
    /// Filter the catalog by this category
    Filter(Uuid),
    /// Open the flyout listing this parent's children
    Expand(Uuid),
}

/// Top-level category with its children
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<Category>,
}

/// Two-level category tree
#[derive(Debug, Clone, Serialize, Default)]
pub struct CategoryTree {
    pub categories: Vec<CategoryNode>,
}

impl CategoryTree {
    /// Group categories under their parents; both levels sorted by name.
    ///
    /// A child whose parent is missing is shown as a top-level category.
    pub fn build(categories: Vec<Category>) -> Self {
        let known: BTreeSet<Uuid> = categories.iter().map(|c| c.id).collect();

        let mut children: HashMap<Uuid, Vec<Category>> = HashMap::new();
        let mut roots = Vec::new();

        for category in categories {
            match category.parent_id {
                Some(parent) if known.contains(&parent) && parent != category.id => {
                    children.entry(parent).or_default().push(category)
                }
                _ => roots.push(category),
            }
        }

        roots.sort_by_key(|c| c.name.to_lowercase());

        let categories = roots
            .into_iter()
            .map(|category| {
                let mut kids = children.remove(&category.id).unwrap_or_default();
                kids.sort_by_key(|c| c.name.to_lowercase());
                CategoryNode {
                    category,
                    children: kids,
                }
            })
            .collect();

        CategoryTree { categories }
    }

    /// Resolve a sidebar click. Returns `None` for unknown ids.
    pub fn select(&self, id: Uuid, viewport: Viewport) -> Option<CategorySelection> {
        for node in &self.categories {
            if node.category.id == id {
                if node.children.is_empty() || viewport == Viewport::Narrow {
                    return Some(CategorySelection::Filter(id));
                }
                return Some(CategorySelection::Expand(id));
            }

            if node.children.iter().any(|c| c.id == id) {
                return Some(CategorySelection::Filter(id));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCondition;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn product(title: &str, description: Option<&str>, location: &str, category: Option<Uuid>) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(str::to_string),
            price: Decimal::new(1500, 2),
            location: location.to_string(),
            image_url: crate::models::PLACEHOLDER_IMAGE_URL.to_string(),
            category_id: category,
            condition: ProductCondition::New,
            warranty: false,
            warranty_period: None,
            features: None,
            contact_phone: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    fn category(name: &str, parent: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            icon: None,
            description: None,
            parent_id: parent,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_is_exactly_the_conjunction_of_active_filters() {
        let grains = Uuid::new_v4();
        let tools = Uuid::new_v4();
        let products = vec![
            product("White Maize", Some("dry, 50kg bags"), "Kumasi", Some(grains)),
            product("Rice", Some("Local MAIZE-free rice"), "Tamale", Some(grains)),
            product("Cutlass", None, "Kumasi", Some(tools)),
            product("Maize sheller", Some("manual"), "Accra", Some(tools)),
            product("Uncategorised maize", None, "Kumasi", None),
        ];

        let categories = [None, Some(grains), Some(tools)];
        let searches = [None, Some(""), Some("maize"), Some("  MAIZE "), Some("nothing")];
        let locations = [None, Some("Kumasi"), Some("Accra"), Some("")];

        for category_id in categories {
            for search in searches {
                for location in locations {
                    let filter = CatalogFilter {
                        category_id,
                        search: search.map(str::to_string),
                        location: location.map(str::to_string),
                    };

                    let expected: Vec<Uuid> = products
                        .iter()
                        .filter(|p| category_id.is_none_or(|c| p.category_id == Some(c)))
                        .filter(|p| match search.map(str::trim).filter(|s| !s.is_empty()) {
                            Some(s) => {
                                let s = s.to_lowercase();
                                p.title.to_lowercase().contains(&s)
                                    || p.description
                                        .as_deref()
                                        .is_some_and(|d| d.to_lowercase().contains(&s))
                            }
                            None => true,
                        })
                        .filter(|p| match location.filter(|l| !l.is_empty()) {
                            Some(l) => p.location == l,
                            None => true,
                        })
                        .map(|p| p.id)
                        .collect();

                    let actual: Vec<Uuid> = filter.apply(&products).iter().map(|p| p.id).collect();
                    assert_eq!(actual, expected, "filter {:?}", filter);

                    for p in &products {
                        assert_eq!(filter.matches(p), expected.contains(&p.id));
                    }
                }
            }
        }
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let products = vec![product("Goat", Some("Healthy BOER breed"), "Ho", None)];
        let filter = CatalogFilter {
            search: Some("boer".to_string()),
            ..Default::default()
        };

        assert_eq!(filter.apply(&products).len(), 1);
    }

    #[test]
    fn location_facets_follow_the_category_filter() {
        let grains = Uuid::new_v4();
        let products = vec![
            product("Maize", None, "Kumasi", Some(grains)),
            product("Millet", None, "Tamale", Some(grains)),
            product("Sorghum", None, "Kumasi", Some(grains)),
            product("Hoe", None, "Accra", None),
            product("Yam", None, "  ", Some(grains)),
        ];

        let filter = CatalogFilter {
            category_id: Some(grains),
            location: Some("Kumasi".to_string()),
            search: Some("sorghum".to_string()),
        };

        assert_eq!(filter.location_facets(&products), vec!["Kumasi", "Tamale"]);

        let everything = CatalogFilter::default();
        assert_eq!(
            everything.location_facets(&products),
            vec!["Accra", "Kumasi", "Tamale"]
        );
    }

    #[test]
    fn load_more_walks_the_fetched_list() {
        let products: Vec<Product> = (0..30)
            .map(|i| {
                let mut p = product(&format!("Crate {}", i), None, "Accra", None);
                p.created_at = Utc::now() - Duration::minutes(i);
                p
            })
            .collect();
        let filter = CatalogFilter::default();

        let first = CatalogPage::build(&products, &filter, RevealWindow::catalog(None));
        assert_eq!(first.products.len(), 12);
        assert_eq!(first.total, 30);
        assert_eq!(first.next_visible, Some(24));
        assert_eq!(first.products[0].title, "Crate 0");

        let second = CatalogPage::build(&products, &filter, RevealWindow::catalog(first.next_visible));
        assert_eq!(second.visible, 24);
        assert_eq!(second.next_visible, Some(30));

        let last = CatalogPage::build(&products, &filter, RevealWindow::catalog(second.next_visible));
        assert_eq!(last.visible, 30);
        assert_eq!(last.next_visible, None);
    }

    #[test]
    fn empty_result_has_no_next_step() {
        let page = CatalogPage::build(&[], &CatalogFilter::default(), RevealWindow::catalog(None));
        assert_eq!(page.total, 0);
        assert_eq!(page.visible, 0);
        assert_eq!(page.next_visible, None);
    }

    #[test]
    fn tree_groups_children_under_parents() {
        let livestock = category("Livestock", None);
        let goats = category("Goats", Some(livestock.id));
        let cattle = category("Cattle", Some(livestock.id));
        let seeds = category("Seeds", None);
        let orphan = category("Orphan", Some(Uuid::new_v4()));

        let tree = CategoryTree::build(vec![
            goats.clone(),
            seeds.clone(),
            livestock.clone(),
            cattle.clone(),
            orphan.clone(),
        ]);

        let names: Vec<&str> = tree
            .categories
            .iter()
            .map(|n| n.category.name.as_str())
            .collect();
        assert_eq!(names, vec!["Livestock", "Orphan", "Seeds"]);

        let children: Vec<&str> = tree.categories[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(children, vec!["Cattle", "Goats"]);
    }

    #[test]
    fn selecting_a_parent_depends_on_viewport() {
        let livestock = category("Livestock", None);
        let goats = category("Goats", Some(livestock.id));
        let seeds = category("Seeds", None);
        let tree = CategoryTree::build(vec![livestock.clone(), goats.clone(), seeds.clone()]);

        assert_eq!(
            tree.select(livestock.id, Viewport::Wide),
            Some(CategorySelection::Expand(livestock.id))
        );
        assert_eq!(
            tree.select(livestock.id, Viewport::Narrow),
            Some(CategorySelection::Filter(livestock.id))
        );
        assert_eq!(
            tree.select(goats.id, Viewport::Wide),
            Some(CategorySelection::Filter(goats.id))
        );
        assert_eq!(
            tree.select(seeds.id, Viewport::Wide),
            Some(CategorySelection::Filter(seeds.id))
        );
        assert_eq!(tree.select(Uuid::new_v4(), Viewport::Wide), None);
    }

    #[test]
    fn category_search_checks_name_and_description() {
        let mut poultry = category("Poultry", None);
        poultry.description = Some("Layers, broilers and CHICKS".to_string());
        let seeds = category("Seeds", None);
        let categories = vec![poultry, seeds];

        assert_eq!(search_categories(&categories, "chicks").len(), 1);
        assert_eq!(search_categories(&categories, "SEED").len(), 1);
        assert_eq!(search_categories(&categories, "   ").len(), 2);
        assert!(search_categories(&categories, "tractor").is_empty());
    }
}
