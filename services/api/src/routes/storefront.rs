//! Public storefront handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{CategoryQuery, DetailQuery, ProductQuery, SelectQuery},
    state::AppState,
};
use market::blog::BlogPostView;
use market::catalog::{CatalogPage, CategoryTree, RevealWindow, search_categories};
use market::detail::ProductDetail;
use market::store::ProductStore;
use market::support::SupportSubmission;

/// Catalog page for the given filter and window
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<impl IntoResponse> {
    let fetched = state
        .products
        .list(query.category_id)
        .await
        .map_err(ApiError::read("Failed to fetch products"))?;

    let page = CatalogPage::build(&fetched, &query.filter(), RevealWindow::catalog(query.visible));

    Ok(Json(page))
}

/// Product page with its gallery and related products
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .products
        .find_by_id(id)
        .await
        .map_err(ApiError::read("Failed to fetch product"))?
        .ok_or_else(|| ApiError::not_found("Product"))?;

    let images = state
        .products
        .images_for(id)
        .await
        .map_err(ApiError::read("Failed to fetch product images"))?;

    let (category, related) = match product.category_id {
        Some(category_id) => {
            let category = state
                .categories
                .find_by_id(category_id)
                .await
                .map_err(ApiError::read("Failed to fetch category"))?;
            let related = state
                .products
                .related(category_id, id)
                .await
                .map_err(ApiError::read("Failed to fetch related products"))?;
            (category, related)
        }
        None => (None, Vec::new()),
    };

    Ok(Json(ProductDetail::assemble(
        product,
        category,
        images,
        related,
        query.related_visible,
    )))
}

async fn category_tree(state: &AppState, search: Option<&str>) -> ApiResult<CategoryTree> {
    let categories = state
        .categories
        .list()
        .await
        .map_err(ApiError::read("Failed to fetch categories"))?;

    let categories = match search {
        Some(search) => search_categories(&categories, search)
            .into_iter()
            .cloned()
            .collect(),
        None => categories,
    };

    Ok(CategoryTree::build(categories))
}

/// Category sidebar, optionally searched
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(category_tree(&state, query.search.as_deref()).await?))
}

/// Whether a sidebar click filters the catalog or opens the flyout
pub async fn select_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SelectQuery>,
) -> ApiResult<impl IntoResponse> {
    let selection = category_tree(&state, None)
        .await?
        .select(id, query.viewport)
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(Json(selection))
}

/// Updates newest-first
pub async fn list_updates(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let posts = state
        .blog
        .list()
        .await
        .map_err(ApiError::read("Failed to fetch updates"))?;

    let views: Vec<BlogPostView> = posts.into_iter().map(BlogPostView::from).collect();
    Ok(Json(views))
}

pub async fn get_update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let post = state
        .blog
        .find_by_slug(&slug)
        .await
        .map_err(ApiError::read("Failed to fetch update"))?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Json(BlogPostView::from(post)))
}

/// Footer social links; blank ones are omitted
pub async fn social_links(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let links = state
        .settings
        .social_links()
        .await
        .map_err(ApiError::read("Failed to fetch social links"))?;

    Ok(Json(links.published()))
}

/// Public support form.
///
/// Storing the request and relaying it by email are independent and
/// best-effort: once the form validates, the visitor always gets `ok`.
pub async fn submit_support_request(
    State(state): State<AppState>,
    Json(submission): Json<SupportSubmission>,
) -> ApiResult<impl IntoResponse> {
    let request = submission.validate()?;

    match state.support.create(&request).await {
        Ok(stored) => info!("Stored support request {}", stored.id),
        Err(e) => error!("Failed to store support request: {}", e),
    }

    if let Err(e) = state.mailer.send(&request).await {
        error!("Failed to relay support request: {}", e);
    }

    Ok(Json(json!({ "ok": true })))
}
