//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::{AuthError, AuthResult},
    models::{
        CreateAdminRequest, LoginRequest, LoginResponse, LogoutRequest, RefreshTokenRequest,
        RefreshTokenResponse,
    },
    repositories::admin::verify_password,
};
use market::models::{Admin, AdminProfile};
use market::session::{Claims, TokenType};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/logout", post(logout))
        .route("/admin/create", post(create_admin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> AuthError {
    move |e| {
        error!("{}: {}", context, e);
        AuthError::InternalServerError
    }
}

/// Decode a token and require the given type
fn claims_of(state: &AppState, token: &str, expected: TokenType) -> AuthResult<Claims> {
    let claims = state
        .jwt_service
        .validate_token(token)
        .map_err(|_| AuthError::Unauthorized)?;

    if claims.token_type != expected {
        return Err(AuthError::Unauthorized);
    }

    Ok(claims)
}

async fn ensure_not_blacklisted(state: &AppState, token: &str) -> AuthResult<()> {
    let blacklisted = state
        .jwt_service
        .is_token_blacklisted(&state.redis_pool, token)
        .await
        .map_err(internal("Failed to check token blacklist"))?;

    if blacklisted {
        return Err(AuthError::Unauthorized);
    }
    Ok(())
}

fn issue_tokens(state: &AppState, admin: &Admin) -> AuthResult<(String, String)> {
    let access_token = state
        .jwt_service
        .generate_access_token(admin)
        .map_err(internal("Failed to generate access token"))?;

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(admin)
        .map_err(internal("Failed to generate refresh token"))?;

    Ok((access_token, refresh_token))
}

/// Admin login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse> {
    let email = payload.normalized_email();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AuthError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    info!("Login attempt for admin: {}", email);

    if !state.rate_limiter.is_allowed(&email).await {
        warn!("Login rate limit hit for {}", email);
        return Err(AuthError::TooManyAttempts);
    }

    let admin = state
        .admin_repository
        .find_by_email(&email)
        .await
        .map_err(internal("Failed to look up admin"))?
        .filter(|admin| admin.is_active)
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = verify_password(&admin.password_hash, &payload.password)
        .map_err(internal("Failed to verify password"))?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    state.rate_limiter.reset(&email).await;

    let (access_token, refresh_token) = issue_tokens(&state, &admin)?;

    state
        .session_manager
        .store(admin.id, &refresh_token)
        .await
        .map_err(internal("Failed to store session in Redis"))?;

    let response = LoginResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
        admin: AdminProfile::from(&admin),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Refresh token endpoint
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AuthResult<impl IntoResponse> {
    info!("Token refresh request");

    let claims = claims_of(&state, &payload.refresh_token, TokenType::Refresh)?;
    ensure_not_blacklisted(&state, &payload.refresh_token).await?;

    let current = state
        .session_manager
        .is_current(claims.sub, &payload.refresh_token)
        .await
        .map_err(internal("Failed to read session from Redis"))?;
    if !current {
        return Err(AuthError::Unauthorized);
    }

    let admin = state
        .admin_repository
        .find_by_id(claims.sub)
        .await
        .map_err(internal("Failed to look up admin"))?
        .filter(|admin| admin.is_active)
        .ok_or(AuthError::Unauthorized)?;

    let access_token = state
        .jwt_service
        .generate_access_token(&admin)
        .map_err(internal("Failed to generate access token"))?;

    let new_refresh_token = state
        .jwt_service
        .rotate_refresh_token(&state.redis_pool, &admin, &payload.refresh_token)
        .await
        .map_err(internal("Failed to rotate refresh token"))?;

    state
        .session_manager
        .store(admin.id, &new_refresh_token)
        .await
        .map_err(internal("Failed to update session in Redis"))?;

    let response = RefreshTokenResponse {
        access_token,
        refresh_token: new_refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.access_token_expiry(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> AuthResult<impl IntoResponse> {
    info!("Logout request");

    let claims = claims_of(&state, &payload.refresh_token, TokenType::Refresh)?;

    let mut revoked = vec![(payload.refresh_token.clone(), claims.exp)];

    // An access token that is already invalid needs no blacklisting.
    if let Some(access_token) = payload.access_token.as_deref() {
        if let Ok(access) = claims_of(&state, access_token, TokenType::Access) {
            if access.sub == claims.sub {
                revoked.push((access_token.to_string(), access.exp));
            }
        }
    }

    for (token, exp) in revoked {
        let ttl = state
            .jwt_service
            .remaining_lifetime(exp)
            .map_err(internal("Failed to get current time"))?;

        state
            .jwt_service
            .blacklist_token(&state.redis_pool, &token, ttl)
            .await
            .map_err(internal("Failed to blacklist token"))?;
    }

    state
        .session_manager
        .delete(claims.sub)
        .await
        .map_err(internal("Failed to remove session from Redis"))?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    ))
}

/// Create an admin account.
///
/// Open while no admin exists; afterwards the caller must present a valid
/// admin access token.
pub async fn create_admin(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(payload): Json<CreateAdminRequest>,
) -> AuthResult<impl IntoResponse> {
    let existing = state
        .admin_repository
        .count()
        .await
        .map_err(internal("Failed to count admins"))?;

    if existing > 0 {
        let TypedHeader(authorization) = bearer.ok_or(AuthError::Unauthorized)?;
        let claims = claims_of(&state, authorization.token(), TokenType::Access)?;
        ensure_not_blacklisted(&state, authorization.token()).await?;
        info!("Admin {} is creating another admin", claims.sub);
    } else {
        info!("Bootstrapping the first admin account");
    }

    let new_admin = payload.validate()?;

    let admin = state
        .admin_repository
        .create(&new_admin)
        .await
        .map_err(|e| {
            if common::error::is_unique_violation(&e) {
                AuthError::Conflict("An admin with this email already exists".to_string())
            } else {
                error!("Failed to create admin: {}", e);
                AuthError::InternalServerError
            }
        })?;

    Ok((StatusCode::CREATED, Json(AdminProfile::from(&admin))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::tests::{test_admin, test_config};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn router() -> Router {
        create_router(crate::tests::offline_state().await)
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> StatusCode {
        app.oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_requires_email_and_password() {
        let status = post_json(
            router().await,
            "/auth/login",
            serde_json::json!({"email": "  ", "password": "x"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbage_token() {
        let status = post_json(
            router().await,
            "/auth/refresh",
            serde_json::json!({"refresh_token": "garbage"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let service = crate::jwt::JwtService::new(test_config()).unwrap();
        let access = service.generate_access_token(&test_admin()).unwrap();

        let status = post_json(
            router().await,
            "/auth/refresh",
            serde_json::json!({"refresh_token": access}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_rejects_garbage_token() {
        let status = post_json(
            router().await,
            "/auth/logout",
            serde_json::json!({"refresh_token": "garbage"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
