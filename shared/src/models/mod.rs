//! Domain models for the Farmstand POS backend

mod actor;
mod inventory;
mod report;
mod shift;
mod transaction;

pub use actor::*;
pub use inventory::*;
pub use report::*;
pub use shift::*;
pub use transaction::*;
