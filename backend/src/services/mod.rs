//! Business logic services for the Farmstand POS backend

pub mod auth;
pub mod inventory;
pub mod reporting;
pub mod roster;
pub mod shift;
pub mod transactions;

pub use auth::AuthService;
pub use inventory::InventoryService;
pub use reporting::ReportingService;
pub use roster::RosterService;
pub use shift::ShiftService;
pub use transactions::TransactionService;
