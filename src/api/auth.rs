//! Authentication API endpoints
//!
//! Provides the login endpoint and the current-user lookup.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::{
    middleware::auth::{create_access_token, AuthUser},
    models::{LoginRequest, LoginResponse, UserResponse},
    services::AuthService,
    utils::error::AppError,
    AppState,
};

/// Create public routes for authentication endpoints (no auth required)
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Create protected routes for authentication endpoints (auth required)
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// Login handler
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let auth_service = AuthService::new(state.db.clone());

    let user = auth_service
        .authenticate(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    let (token, expires_at) = create_access_token(
        &user,
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| AppError::Internal(format!("Failed to create access token: {}", e)))?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user: user.into(),
    }))
}

/// Current user handler
///
/// GET /api/v1/auth/me
async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone());

    let user = auth_service
        .get_user(auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth_user.id)))?;

    Ok(Json(user.into()))
}
