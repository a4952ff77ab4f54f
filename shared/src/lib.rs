//! Shared types and models for the Farmstand POS backend
//!
//! This crate contains the domain types shared between the HTTP backend and
//! other components of the system (report tooling, scheduling harnesses).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
