//! API service routes

use axum::{
    Json, Router,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::admin_auth, state::AppState};

pub mod admin;
pub mod storefront;

/// Create the router for the API service
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    let admin_routes = Router::new()
        .route("/admin/products", get(admin::list_products))
        .route("/admin/products/:id", delete(admin::delete_product))
        .route("/admin/drafts", post(admin::start_draft))
        .route(
            "/admin/drafts/:id",
            get(admin::get_draft)
                .put(admin::update_draft)
                .delete(admin::discard_draft),
        )
        .route("/admin/drafts/:id/images", post(admin::add_image))
        .route(
            "/admin/drafts/:id/images/:index",
            delete(admin::remove_image),
        )
        .route("/admin/drafts/:id/advance", post(admin::advance_draft))
        .route("/admin/drafts/:id/back", post(admin::back_draft))
        .route("/admin/drafts/:id/submit", post(admin::submit_draft))
        .route(
            "/admin/categories",
            get(admin::list_categories).post(admin::create_category),
        )
        .route(
            "/admin/categories/:id",
            put(admin::update_category).delete(admin::delete_category),
        )
        .route("/admin/vendors", get(admin::list_vendors))
        .route("/admin/vendors/invites", post(admin::invite_vendor))
        .route(
            "/admin/updates",
            get(admin::list_updates).post(admin::create_update),
        )
        .route(
            "/admin/updates/:id",
            put(admin::update_update).delete(admin::delete_update),
        )
        .route(
            "/admin/settings",
            get(admin::get_settings).put(admin::save_settings),
        )
        .route("/admin/support-requests", get(admin::list_support_requests))
        .route(
            "/admin/support-requests/:id",
            patch(admin::update_support_status),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    Router::new()
        .route("/health", get(health_check))
        .route("/products", get(storefront::list_products))
        .route("/products/:id", get(storefront::get_product))
        .route("/categories", get(storefront::list_categories))
        .route("/categories/:id/select", get(storefront::select_category))
        .route("/updates", get(storefront::list_updates))
        .route("/updates/:slug", get(storefront::get_update))
        .route("/social-links", get(storefront::social_links))
        .route("/support-request", post(storefront::submit_support_request))
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}
