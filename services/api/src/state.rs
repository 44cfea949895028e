//! Application state shared across handlers

use common::cache::RedisPool;
use sqlx::PgPool;

use crate::{
    mailer::SupportMailer,
    middleware::JwtVerifier,
    repositories::{
        BlogRepository, CategoryRepository, DraftRepository, ProductRepository,
        SettingsRepository, SupportRepository, VendorRepository,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub jwt_verifier: JwtVerifier,
    pub mailer: SupportMailer,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub vendors: VendorRepository,
    pub blog: BlogRepository,
    pub settings: SettingsRepository,
    pub support: SupportRepository,
    pub drafts: DraftRepository,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        redis_pool: RedisPool,
        jwt_verifier: JwtVerifier,
        mailer: SupportMailer,
    ) -> Self {
        Self {
            products: ProductRepository::new(db_pool.clone()),
            categories: CategoryRepository::new(db_pool.clone()),
            vendors: VendorRepository::new(db_pool.clone()),
            blog: BlogRepository::new(db_pool.clone()),
            settings: SettingsRepository::new(db_pool.clone()),
            support: SupportRepository::new(db_pool),
            drafts: DraftRepository::new(redis_pool.clone()),
            redis_pool,
            jwt_verifier,
            mailer,
        }
    }
}
