//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the `User` entity, the `Username` value object and the rules behind it.

pub mod constants;
pub mod error;
pub mod user;
pub mod username;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use user::{User, UserResponse};
pub use username::{require_non_blank, Username};
