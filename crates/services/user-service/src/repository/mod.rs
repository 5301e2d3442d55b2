//! Repository layer - Data access abstraction.
//!
//! The repository is the only code that talks to the database and the only
//! place storage errors are classified.

pub mod entities;
mod error;
mod unit_of_work;
mod user_repository;

pub use error::{is_duplicate_key, RepoError, RepoResult};
pub use unit_of_work::{Persistence, TransactionScope, UnitOfWork};
pub use user_repository::{UserRepository, UserStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
