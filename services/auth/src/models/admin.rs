//! Admin account payloads

use market::MarketError;
use market::models::AdminProfile;
use market::validation::{optional, validate_email, validate_password};
use serde::{Deserialize, Serialize};

/// Request for admin login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// Normalized email used for lookup and rate limiting
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Response for admin login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub admin: AdminProfile,
}

/// Request for token refresh
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response for token refresh
#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request for logout; the access token is optional
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
    pub access_token: Option<String>,
}

/// Request to create an admin account
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub full_name: Option<String>,
}

/// Validated admin account, password still in clear text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmin {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl CreateAdminRequest {
    pub fn validate(&self) -> Result<NewAdmin, MarketError> {
        let email = self.email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(&self.password)?;

        Ok(NewAdmin {
            email,
            password: self.password.clone(),
            full_name: optional(self.full_name.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_admin_validation() {
        let request = CreateAdminRequest {
            email: " Owner@AgriBuyX.com ".to_string(),
            password: "harvest2024".to_string(),
            full_name: Some("  ".to_string()),
        };
        let admin = request.validate().unwrap();
        assert_eq!(admin.email, "owner@agribuyx.com");
        assert_eq!(admin.full_name, None);

        let weak = CreateAdminRequest {
            email: "owner@agribuyx.com".to_string(),
            password: "short".to_string(),
            full_name: None,
        };
        assert!(weak.validate().is_err());
    }

    #[test]
    fn test_login_email_is_normalized() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":" Admin@AgriBuyX.com","password":"x"}"#).unwrap();
        assert_eq!(request.normalized_email(), "admin@agribuyx.com");
    }
}
