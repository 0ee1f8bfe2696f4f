//! # Collaborator Traits
//!
//! The ports scout-core looks through. Every external lookup - products,
//! barcodes, file records, permissions - goes via one of these traits,
//! which makes the resolver and normalizer testable against in-memory
//! fakes and keeps framework singletons out of the core.
//!
//! ## Port Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Resolver ────► Catalog (trait) ◄──── ProductRepository (scout-db)    │
//! │                                  ◄──── FakeCatalog       (tests)       │
//! │                                                                         │
//! │   ImageNormalizer ─► FileStore (trait) ◄─ FileRepository  (scout-db)   │
//! │                                        ◄─ FakeFileStore   (tests)      │
//! │                                                                         │
//! │   Endpoints ──► PermissionGate (trait) ◄─ TokenGate       (app)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract Notes
//! - All `find_*` methods return ONLY enabled, stock-tracked products,
//!   ordered most-recently-modified first. Implementations enforce this;
//!   the resolver relies on it.
//! - "Not found" is `Ok` with an empty Vec / `None`. `Err` strictly means
//!   the store itself failed.

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::types::{Action, FileRecord, Principal, Product};

// =============================================================================
// Catalog
// =============================================================================

/// Read-only access to the product catalog and its barcode index.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolves a barcode to the ids of products that own it.
    ///
    /// The index is many-to-one: a product may own several barcodes, but
    /// one barcode maps to at most one product.
    async fn owners_of_barcode(&self, barcode: &str, limit: u32) -> CatalogResult<Vec<String>>;

    /// Fetches listable products by id.
    async fn find_by_ids(&self, ids: &[String], limit: u32) -> CatalogResult<Vec<Product>>;

    /// Fetches listable products whose code equals `code` exactly.
    async fn find_by_code(&self, code: &str, limit: u32) -> CatalogResult<Vec<Product>>;

    /// Fetches listable products whose code contains `fragment`.
    async fn find_by_code_fragment(&self, fragment: &str, limit: u32)
        -> CatalogResult<Vec<Product>>;

    /// Fetches listable products whose name contains `fragment`.
    async fn find_by_name_fragment(&self, fragment: &str, limit: u32)
        -> CatalogResult<Vec<Product>>;

    /// Paged listing of listable products, most recently modified first.
    async fn list(&self, limit: u32, offset: u32) -> CatalogResult<Vec<Product>>;

    /// Fetches a single product by id, listable or not.
    ///
    /// Detail views decide for themselves how to treat disabled products;
    /// resolution paths never call this.
    async fn get(&self, id: &str) -> CatalogResult<Option<Product>>;

    /// Counts listable products (diagnostics).
    async fn count(&self) -> CatalogResult<i64>;
}

// =============================================================================
// File Store
// =============================================================================

/// Read-only access to stored-file metadata.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Looks up a file record by id. `Ok(None)` when no such record.
    async fn get_record(&self, id: &str) -> CatalogResult<Option<FileRecord>>;
}

// =============================================================================
// Permission Gate
// =============================================================================

/// Answers "who is calling and what may they do".
///
/// Synchronous on purpose: gate decisions are made from already-extracted
/// request state, no I/O involved.
pub trait PermissionGate: Send + Sync {
    /// The identity of the current caller.
    fn principal(&self) -> Principal;

    /// Whether the caller may perform `action` on products.
    fn can(&self, action: Action) -> bool;
}
