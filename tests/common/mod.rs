//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure including:
//! - Domain fixtures and payload builders
//! - Test database setup
//! - API test client


pub use fixtures::*;
pub use test_app::*;
