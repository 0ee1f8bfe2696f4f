//! # scout-core: Pure Lookup Logic for Scout
//!
//! This crate is the **heart** of Scout. It contains the multi-strategy
//! product resolution algorithm and the image reference normalizer as pure
//! logic over injected collaborator traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Scout Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/search-api)                   │   │
//! │  │    list ──► search ──► resolve ──► by-code ──► by-barcode      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ scout-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ resolver  │  │   image   │  │ permission│  │   │
//! │  │   │  Product  │  │  4 stages │  │ normalize │  │   gate    │  │   │
//! │  │   │  Strategy │  │ + search  │  │  to URL   │  │   echo    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PORTS ONLY               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ Catalog / FileStore traits             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    scout-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ResolutionResult, ImageReference, ...)
//! - [`catalog`] - Collaborator traits (Catalog, FileStore, PermissionGate)
//! - [`resolver`] - The four-stage resolution chain and bulk union search
//! - [`image`] - Raw image reference to absolute URL normalization
//! - [`permission`] - Access checks and permission echo
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Ports, not globals**: Every external lookup goes through an injected
//!    trait, never a framework singleton
//! 2. **Degrade, never raise**: a failing collaborator call is logged and
//!    treated as "zero matches" / "unresolvable" at the call site
//! 3. **Explicit Errors**: "not found" is `Ok` and empty; only upstream
//!    failures are `Err`, and they never escape the resolver

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod image;
pub mod permission;
pub mod resolver;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use scout_core::Resolver` instead of
// `use scout_core::resolver::Resolver`

pub use catalog::{Catalog, FileStore, PermissionGate};
pub use error::{CatalogError, CatalogResult};
pub use image::ImageNormalizer;
pub use resolver::Resolver;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Per-stage result cap for the resolution chain.
///
/// Every catalog stage (barcode, exact code, partial code, name) fetches at
/// most this many products; the winning stage's products become the result.
pub const STAGE_LIMIT: u32 = 5;

/// Default result cap for bulk search and listing.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Hard upper bound on caller-supplied limits.
///
/// Prevents a single request from dragging the whole catalog over the wire.
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Minimum query length for bulk search.
///
/// Single-character fragments match most of the catalog and are rejected
/// before any catalog access, same as empty input.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;
