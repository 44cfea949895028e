//! Admin authentication middleware for JWT token validation

use anyhow::Result;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::env;
use tracing::error;

use crate::{error::ApiError, state::AppState};
use market::session::{AdminSession, Claims, TokenType, blacklist_key};

/// JWT verification settings
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Public key for verifying tokens
    pub public_key: String,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// `JWT_PUBLIC_KEY` holds the PEM itself or a path to it.
    pub fn from_env() -> Result<Self> {
        let public_key = env::var("JWT_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PUBLIC_KEY environment variable not set"))?;

        let public_key = if public_key.starts_with("-----BEGIN") {
            public_key
        } else {
            std::fs::read_to_string(&public_key)
                .or_else(|_| {
                    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
                    path.push(&public_key);
                    std::fs::read_to_string(path)
                })
                .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?
                .trim()
                .to_string()
        };

        Ok(JwtConfig { public_key })
    }
}

/// Verifies admin access tokens issued by the auth service
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(config.public_key.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Decode an access token; refresh tokens are refused
    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        let claims =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.token_type != TokenType::Access {
            anyhow::bail!("Token is not an access token");
        }

        Ok(claims)
    }
}

/// Authentication middleware.
///
/// Requires a valid, non-blacklisted Bearer access token and inserts the
/// [`AdminSession`] into the request extensions.
pub async fn admin_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let claims = state.jwt_verifier.verify_access(&token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    let blacklisted = state
        .redis_pool
        .exists(&blacklist_key(&token))
        .await
        .map_err(|e| {
            error!("Failed to check if token is blacklisted: {}", e);
            ApiError::InternalServerError
        })?;

    if blacklisted {
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AdminSession::from(claims));

    Ok(next.run(req).await)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header};
    use serial_test::serial;
    use uuid::Uuid;

    pub(crate) const PRIVATE_KEY: &str = include_str!("../../../fixtures/jwt/private.pem");
    pub(crate) const PUBLIC_KEY: &str = include_str!("../../../fixtures/jwt/public.pem");
    pub(crate) const OTHER_PRIVATE_KEY: &str =
        include_str!("../../../fixtures/jwt/other_private.pem");

    pub(crate) fn verifier() -> JwtVerifier {
        JwtVerifier::new(&JwtConfig {
            public_key: PUBLIC_KEY.to_string(),
        })
        .unwrap()
    }

    /// Sign a token for a fixed admin, expiring `ttl` seconds from now
    pub(crate) fn sign(private_key: &str, token_type: TokenType, ttl: u64) -> String {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "admin@agribuyx.com".to_string(),
            name: Some("Ama Mensah".to_string()),
            iat: now,
            exp: now + ttl,
            token_type,
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(private_key.as_bytes()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_accepted() {
        let token = sign(PRIVATE_KEY, TokenType::Access, 900);
        let claims = verifier().verify_access(&token).unwrap();

        let session = AdminSession::from(claims);
        assert_eq!(session.email, "admin@agribuyx.com");
        assert_eq!(session.name.as_deref(), Some("Ama Mensah"));
    }

    #[test]
    fn test_refresh_token_rejected() {
        let token = sign(PRIVATE_KEY, TokenType::Refresh, 900);
        assert!(verifier().verify_access(&token).is_err());
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let token = sign(OTHER_PRIVATE_KEY, TokenType::Access, 900);
        assert!(verifier().verify_access(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "admin@agribuyx.com".to_string(),
            name: None,
            iat: now - 120,
            exp: now - 60,
            token_type: TokenType::Access,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap(),
        )
        .unwrap();

        assert!(verifier().verify_access(&token).is_err());
    }

    #[test]
    #[serial]
    fn test_config_from_path() {
        unsafe {
            env::set_var("JWT_PUBLIC_KEY", "../../fixtures/jwt/public.pem");
        }

        let config = JwtConfig::from_env().unwrap();
        assert!(config.public_key.starts_with("-----BEGIN PUBLIC KEY-----"));
        assert!(JwtVerifier::new(&config).is_ok());

        unsafe {
            env::remove_var("JWT_PUBLIC_KEY");
        }
    }
}
