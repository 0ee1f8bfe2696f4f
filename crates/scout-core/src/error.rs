//! # Error Types
//!
//! Domain-specific error types for scout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  scout-core errors (this file)                                         │
//! │  └── CatalogError     - A collaborator call failed upstream            │
//! │                                                                         │
//! │  scout-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: DbError → CatalogError → degraded to empty inside the resolver  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. "Not found" is NOT an error - it is `Ok` with an empty result
//! 2. Upstream failures are typed so call sites can tell "no match" from
//!    "the store fell over", even though both degrade to the same outcome
//! 3. Errors are enum variants, never bare Strings at the API boundary

use thiserror::Error;

// =============================================================================
// Catalog Error
// =============================================================================

/// A failure reported by a collaborator (catalog store or file store).
///
/// The resolver and the image normalizer catch these locally: a failed stage
/// counts as zero matches and a failed file lookup falls through to the next
/// rule. Nothing of this type ever escapes to API callers.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store accepted the request but failed to execute it.
    #[error("catalog query failed: {0}")]
    QueryFailed(String),

    /// The backing store could not be reached at all.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Creates a QueryFailed error from any displayable cause.
    pub fn query(cause: impl std::fmt::Display) -> Self {
        CatalogError::QueryFailed(cause.to_string())
    }

    /// Creates an Unavailable error from any displayable cause.
    pub fn unavailable(cause: impl std::fmt::Display) -> Self {
        CatalogError::Unavailable(cause.to_string())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for collaborator call results.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CatalogError::query("disk I/O error");
        assert_eq!(err.to_string(), "catalog query failed: disk I/O error");

        let err = CatalogError::unavailable("pool closed");
        assert_eq!(err.to_string(), "catalog unavailable: pool closed");
    }
}
