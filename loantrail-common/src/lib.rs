//! # LoanTrail Common Library
//!
//! Core data-management layer for the LoanTrail lead tracker:
//! - Lead domain model and status pipeline
//! - Form-input normalization
//! - The owning lead store (CRUD, status moves, merge-import, persistence)
//! - View projections and aggregate metrics
//! - JSON/CSV transfer codec
//! - Configuration loading and data folder resolution

pub mod codec;
pub mod config;
pub mod contact;
pub mod error;
pub mod model;
pub mod normalize;
pub mod serde_lenient;
pub mod storage;
pub mod store;
pub mod time;
pub mod view;

pub use error::{Error, Result};
pub use model::{Lead, LeadPatch, LeadStatus};
pub use store::LeadStore;
