//! Product drafts held in Redis between form steps

use anyhow::Result;
use common::cache::RedisPool;
use uuid::Uuid;

use market::draft::ProductDraft;

/// How long an untouched draft survives
pub const DRAFT_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Redis key of a draft; drafts are private to the admin who opened them
pub fn draft_key(admin_id: Uuid, draft_id: Uuid) -> String {
    format!("draft:{}:{}", admin_id, draft_id)
}

/// Draft repository
#[derive(Clone)]
pub struct DraftRepository {
    redis_pool: RedisPool,
}

impl DraftRepository {
    /// Create a new draft repository
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }

    /// Store a draft, restarting its TTL
    pub async fn save(&self, admin_id: Uuid, draft: &ProductDraft) -> Result<()> {
        self.redis_pool
            .set_json(&draft_key(admin_id, draft.id), draft, Some(DRAFT_TTL_SECONDS))
            .await
    }

    /// Load a draft
    pub async fn load(&self, admin_id: Uuid, draft_id: Uuid) -> Result<Option<ProductDraft>> {
        self.redis_pool
            .get_json(&draft_key(admin_id, draft_id))
            .await
    }

    /// Discard a draft
    pub async fn discard(&self, admin_id: Uuid, draft_id: Uuid) -> Result<()> {
        self.redis_pool.delete(&draft_key(admin_id, draft_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_key_scoped_to_admin() {
        let admin = Uuid::new_v4();
        let draft = Uuid::new_v4();

        assert_eq!(draft_key(admin, draft), format!("draft:{}:{}", admin, draft));
        assert_ne!(draft_key(Uuid::new_v4(), draft), draft_key(admin, draft));
    }
}
