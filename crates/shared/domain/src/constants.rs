//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement (any non-empty password is accepted)
pub const MIN_PASSWORD_LENGTH: usize = 1;

/// Minimum username length requirement
pub const MIN_USERNAME_LENGTH: usize = 1;

/// Minimum recipe title length, in characters
pub const MIN_TITLE_LENGTH: usize = 1;

/// Minimum recipe instructions length, in characters
pub const MIN_INSTRUCTIONS_LENGTH: usize = 50;

// =============================================================================
// Error messages
// =============================================================================

/// Returned by every attempt to read a credential back
pub const CREDENTIAL_NOT_READABLE: &str = "credential is not readable";

/// Placeholder printed instead of secrets in debug output
pub const REDACTED: &str = "[REDACTED]";
