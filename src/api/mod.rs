//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::middleware::AuthUser;
use crate::utils::error::AppError;
use crate::AppState;

mod assets;
mod auth;
mod employees;
mod health;
mod inventory;
mod movements;
mod references;

pub use health::*;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        // Authentication endpoints (no auth required)
        .nest("/auth", auth::public_routes())
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // Protected auth endpoints (me)
        .nest("/auth", auth::protected_routes())
        // Resource endpoints
        .nest("/assets", assets::routes())
        .nest("/movements", movements::routes())
        .nest("/inventory", inventory::routes())
        .nest("/references", references::routes())
        .nest("/employees", employees::routes())
}

/// Create the full API router (public + protected; useful for tests)
pub fn routes() -> Router<AppState> {
    public_routes().merge(protected_routes())
}

/// Reject non-admin callers on mutating reference and personnel routes
pub(crate) fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User {} does not have the admin role",
            user.username
        )))
    }
}
