//! Admin session claims shared by the auth and api services

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Admin ID
    pub sub: Uuid,
    /// Admin email
    pub email: String,
    /// Admin display name
    pub name: Option<String>,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Authenticated admin, injected into back-office handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSession {
    pub admin_id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<Claims> for AdminSession {
    fn from(claims: Claims) -> Self {
        Self {
            admin_id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

/// Redis key of a blacklisted token
pub fn blacklist_key(token: &str) -> String {
    format!("blacklisted_token:{}", token)
}

/// Redis key holding an admin's current refresh token
pub fn session_key(admin_id: Uuid) -> String {
    format!("session:{}", admin_id)
}
