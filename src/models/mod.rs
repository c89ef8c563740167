//! Data models

mod asset;
mod employee;
mod inventory;
mod movement;
mod reference;
mod user;

pub use asset::*;
pub use employee::*;
pub use inventory::*;
pub use movement::*;
pub use reference::*;
pub use user::*;
