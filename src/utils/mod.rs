//! Shared utilities

pub mod error;
pub mod inventory_code;
pub mod validation;

pub use error::{AppError, AppResult, ErrorResponse};
