//! HTTP handlers for the Farmstand POS backend

pub mod auth;
pub mod health;
pub mod inventory;
pub mod reports;
pub mod roster;
pub mod settings;
pub mod transactions;

pub use auth::*;
pub use health::*;
pub use inventory::*;
pub use reports::*;
pub use roster::*;
pub use settings::*;
pub use transactions::*;
