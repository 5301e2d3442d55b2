//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Username
// =============================================================================

/// Minimum username length, in characters
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length, in characters (matches the `users.username` column)
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Allowed username characters: ASCII letters, digits, hyphen and underscore
pub const USERNAME_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

// =============================================================================
// Pagination
// =============================================================================

/// Default number of users returned by a list call
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum number of users a single list call may return
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest offset a list call accepts; SQL `OFFSET` is a signed 64-bit value
pub const MAX_PAGE_OFFSET: u64 = i64::MAX as u64;
