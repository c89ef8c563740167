//! Business logic services

pub mod audit;
pub mod auth;
pub mod employee;
pub mod movement;

pub use audit::AuditService;
pub use auth::AuthService;
pub use employee::EmployeeService;
pub use movement::MovementService;
