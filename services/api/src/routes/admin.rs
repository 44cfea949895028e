//! Back-office handlers; every route here sits behind [`admin_auth`].
//!
//! [`admin_auth`]: crate::middleware::admin_auth

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{AddImageRequest, StartDraftRequest, SupportQuery},
    state::AppState,
};
use common::error::is_unique_violation;
use market::admin::{CategoryInput, InviteRequest};
use market::blog::BlogPostInput;
use market::draft::{FieldsPatch, ProductDraft};
use market::models::Category;
use market::session::AdminSession;
use market::settings::SocialLinks;
use market::store::{self, ProductStore};
use market::support::StatusUpdate;

/// All products newest-first
pub async fn list_products(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let products = state
        .products
        .list(None)
        .await
        .map_err(ApiError::read("Failed to fetch products"))?;

    Ok(Json(products))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    info!("Admin {} deleting product {}", session.email, id);

    let deleted = state
        .products
        .delete(id)
        .await
        .map_err(ApiError::write("deleting product"))?;

    if !deleted {
        return Err(ApiError::not_found("Product"));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn load_draft(state: &AppState, session: &AdminSession, id: Uuid) -> ApiResult<ProductDraft> {
    state
        .drafts
        .load(session.admin_id, id)
        .await
        .map_err(ApiError::read("Failed to load draft"))?
        .ok_or_else(|| ApiError::not_found("Draft"))
}

async fn save_draft(
    state: &AppState,
    session: &AdminSession,
    draft: ProductDraft,
) -> ApiResult<Json<ProductDraft>> {
    state
        .drafts
        .save(session.admin_id, &draft)
        .await
        .map_err(ApiError::write("saving draft"))?;

    Ok(Json(draft))
}

/// Open a draft, pre-loaded from the product when editing
pub async fn start_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    request: Option<Json<StartDraftRequest>>,
) -> ApiResult<impl IntoResponse> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let draft = match request.product_id {
        Some(product_id) => {
            let product = state
                .products
                .find_by_id(product_id)
                .await
                .map_err(ApiError::read("Failed to fetch product"))?
                .ok_or_else(|| ApiError::not_found("Product"))?;
            let images = state
                .products
                .images_for(product_id)
                .await
                .map_err(ApiError::read("Failed to fetch product images"))?;
            ProductDraft::for_edit(&product, &images)
        }
        None => ProductDraft::new(Some(session.admin_id)),
    };

    info!("Admin {} opened draft {}", session.email, draft.id);
    let draft = save_draft(&state, &session, draft).await?;

    Ok((StatusCode::CREATED, draft))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(load_draft(&state, &session, id).await?))
}

/// Patch the form fields; the step is unchanged
pub async fn update_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
    Json(patch): Json<FieldsPatch>,
) -> ApiResult<impl IntoResponse> {
    let mut draft = load_draft(&state, &session, id).await?;
    draft.apply(patch);
    save_draft(&state, &session, draft).await
}

pub async fn add_image(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddImageRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut draft = load_draft(&state, &session, id).await?;
    draft.add_image(&request.url)?;
    save_draft(&state, &session, draft).await
}

pub async fn remove_image(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> ApiResult<impl IntoResponse> {
    let mut draft = load_draft(&state, &session, id).await?;
    draft.remove_image(index)?;
    save_draft(&state, &session, draft).await
}

pub async fn advance_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let mut draft = load_draft(&state, &session, id).await?;
    draft.advance()?;
    save_draft(&state, &session, draft).await
}

pub async fn back_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let mut draft = load_draft(&state, &session, id).await?;
    draft.back()?;
    save_draft(&state, &session, draft).await
}

/// Save the draft as a product.
///
/// A failed write leaves the draft in place so the admin can retry.
pub async fn submit_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let draft = load_draft(&state, &session, id).await?;
    let product = store::submit_draft(&state.products, &draft).await?;

    if let Err(e) = state.drafts.discard(session.admin_id, id).await {
        error!("Failed to discard submitted draft {}: {}", id, e);
    }

    Ok(Json(product))
}

pub async fn discard_draft(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .drafts
        .discard(session.admin_id, id)
        .await
        .map_err(ApiError::write("discarding draft"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let categories = state
        .categories
        .list()
        .await
        .map_err(ApiError::read("Failed to fetch categories"))?;

    Ok(Json(categories))
}

async fn parent_of(state: &AppState, input: &CategoryInput) -> ApiResult<Option<Category>> {
    match input.parent_id {
        Some(parent_id) => state
            .categories
            .find_by_id(parent_id)
            .await
            .map_err(ApiError::read("Failed to fetch parent category")),
        None => Ok(None),
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<impl IntoResponse> {
    let parent = parent_of(&state, &input).await?;
    let category = input.validate(None, parent.as_ref())?;

    let created = state
        .categories
        .create(&category)
        .await
        .map_err(ApiError::write("creating category"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<impl IntoResponse> {
    let parent = parent_of(&state, &input).await?;
    let category = input.validate(Some(id), parent.as_ref())?;

    // Only one level of nesting: a parent cannot become a child.
    if category.parent_id.is_some() {
        let has_children = state
            .categories
            .has_children(id)
            .await
            .map_err(ApiError::read("Failed to check subcategories"))?;
        if has_children {
            return Err(ApiError::BadRequest(
                "A category with subcategories cannot be nested".to_string(),
            ));
        }
    }

    let updated = state
        .categories
        .update(id, &category)
        .await
        .map_err(ApiError::write("updating category"))?
        .ok_or_else(|| ApiError::not_found("Category"))?;

    Ok(Json(updated))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .categories
        .delete(id)
        .await
        .map_err(ApiError::write("deleting category"))?;

    if !deleted {
        return Err(ApiError::not_found("Category"));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_vendors(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let vendors = state
        .vendors
        .list()
        .await
        .map_err(ApiError::read("Failed to fetch vendors"))?;

    Ok(Json(vendors))
}

pub async fn invite_vendor(
    State(state): State<AppState>,
    Json(request): Json<InviteRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = request.validate()?;

    let invite = state
        .vendors
        .create_invite(&email)
        .await
        .map_err(ApiError::write("creating invite"))?;

    Ok((StatusCode::CREATED, Json(invite)))
}

pub async fn list_updates(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let posts = state
        .blog
        .list()
        .await
        .map_err(ApiError::read("Failed to fetch updates"))?;

    Ok(Json(posts))
}

fn post_write_error(action: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
    move |e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("A post with this slug already exists".to_string())
        } else {
            ApiError::write(action)(e)
        }
    }
}

pub async fn create_update(
    State(state): State<AppState>,
    Json(input): Json<BlogPostInput>,
) -> ApiResult<impl IntoResponse> {
    let post = input.validate()?;

    let created = state
        .blog
        .create(&post)
        .await
        .map_err(post_write_error("creating post"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BlogPostInput>,
) -> ApiResult<impl IntoResponse> {
    let post = input.validate()?;

    let updated = state
        .blog
        .update(id, &post)
        .await
        .map_err(post_write_error("updating post"))?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Json(updated))
}

pub async fn delete_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .blog
        .delete(id)
        .await
        .map_err(ApiError::write("deleting post"))?;

    if !deleted {
        return Err(ApiError::not_found("Post"));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_settings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let links = state
        .settings
        .social_links()
        .await
        .map_err(ApiError::read("Failed to fetch settings"))?;

    Ok(Json(links))
}

/// Save the social links; other settings rows are left alone
pub async fn save_settings(
    State(state): State<AppState>,
    Json(links): Json<SocialLinks>,
) -> ApiResult<impl IntoResponse> {
    let saved = state
        .settings
        .save_social_links(&links)
        .await
        .map_err(ApiError::write("saving settings"))?;

    Ok(Json(saved))
}

pub async fn list_support_requests(
    State(state): State<AppState>,
    Query(query): Query<SupportQuery>,
) -> ApiResult<impl IntoResponse> {
    let requests = state
        .support
        .list()
        .await
        .map_err(ApiError::read("Failed to fetch support requests"))?;

    Ok(Json(query.status.apply(requests)))
}

pub async fn update_support_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<impl IntoResponse> {
    let updated = state
        .support
        .update_status(id, update.status)
        .await
        .map_err(ApiError::write("updating support request"))?
        .ok_or_else(|| ApiError::not_found("Support request"))?;

    Ok(Json(updated))
}
