//! Admin repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::NewAdmin;
use market::models::Admin;

const ADMIN_COLUMNS: &str = "id, email, password_hash, full_name, is_active, created_at";

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Admin repository
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    /// Create a new admin repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of admin accounts
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a new admin, hashing the password
    pub async fn create(&self, new_admin: &NewAdmin) -> Result<Admin> {
        info!("Creating admin: {}", new_admin.email);

        let password_hash = hash_password(&new_admin.password)?;

        let admin = sqlx::query_as::<_, Admin>(&format!(
            r#"
            INSERT INTO admins (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING {ADMIN_COLUMNS}
            "#
        ))
        .bind(&new_admin.email)
        .bind(&password_hash)
        .bind(&new_admin.full_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Find an admin by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        info!("Finding admin by email: {}", email);

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Find an admin by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("harvest2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "harvest2024").unwrap());
        assert!(!verify_password(&hash, "harvest2025").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("plaintext", "plaintext").is_err());
    }
}
