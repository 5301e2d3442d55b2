//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling and its HTTP mapping
//! - Configuration structures
//! - Pagination types

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, BoxError, OptionExt};
pub use pagination::{Page, PageRequest};
