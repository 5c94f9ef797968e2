//! Constants shared across the crate
//!
//! Attribute keys and message texts live here so callers matching on them have
//! a single source of truth.

// ============================================================================
// RESULT ATTRIBUTE CONSTANTS
// ============================================================================

/// Attribute under which `perform` stores a rescued error on the failure result
pub const ERROR_ATTRIBUTE: &str = "error";

// ============================================================================
// MESSAGE CONSTANTS
// ============================================================================

// Error message prefixes
pub(crate) const MSG_INVALID_PREFIX: &str = "Invalid";
pub(crate) const MSG_MISSING_PREFIX: &str = "Missing";

/// Message carried by `InvalidResult`
pub const MSG_INVALID_RESULT: &str =
    "Operations must return either a success or a failure result.";

/// Message carried by `NotImplemented`
pub const MSG_NOT_IMPLEMENTED: &str = "Operations must implement `execute`.";
