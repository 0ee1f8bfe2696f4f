//! # Domain Types
//!
//! Core domain types used throughout Scout.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ResolutionResult │   │   FileRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  products       │   │  id             │       │
//! │  │  code (business)│   │  strategy tag   │   │  file_url       │       │
//! │  │  name, image    │   │  (per request)  │   │  is_private     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ SearchStrategy  │   │ ImageReference  │   │   Principal     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Barcode        │   │  AbsoluteUrl    │   │  Guest          │       │
//! │  │  ExactCode      │   │  RelativePath   │   │  User(name)     │       │
//! │  │  PartialCode    │   │  FileRecordId   │   └─────────────────┘       │
//! │  │  Name           │   │  Filename       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products carry two identifiers:
//! - `id`: UUID v4 - immutable, used for relations and deduplication
//! - `code`: business key - human-readable, what cashiers type and scan against

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A catalog product available for lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code - what barcode fallbacks and code searches match on.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Raw image reference as stored: absolute URL, relative path,
    /// file-record id, or bare filename. Normalized on the way out.
    pub image: Option<String>,

    /// Product category.
    pub category: Option<String>,

    /// Unit of measure (e.g. "Unit", "Kg").
    pub unit: String,

    /// Disabled products are invisible to every resolution path.
    pub disabled: bool,

    /// Only stock-tracked products participate in resolution.
    pub track_stock: bool,

    /// Current stock level, if known.
    pub current_stock: Option<i64>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last modified. Resolution orders by this,
    /// most recent first.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether this product may appear in resolution and listing results.
    #[inline]
    pub fn is_listable(&self) -> bool {
        !self.disabled && self.track_stock
    }
}

// =============================================================================
// File Record
// =============================================================================

/// Stored-file metadata, distinct from a raw path string.
///
/// A product's `image` field may hold a file-record id instead of a path;
/// the record then carries the actual URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Record identifier.
    pub id: String,

    /// Original filename.
    pub file_name: String,

    /// Resolvable URL, absolute or site-relative. May be absent for
    /// records that were never attached to a stored file.
    pub file_url: Option<String>,

    /// Private files live under `/private/files/`.
    pub is_private: bool,
}

// =============================================================================
// Search Strategy
// =============================================================================

/// One lookup stage in the ordered resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Exact match against the barcode index.
    Barcode,
    /// Exact match on the business code.
    ExactCode,
    /// Substring match on the business code.
    PartialCode,
    /// Substring match on the display name.
    Name,
}

impl SearchStrategy {
    /// The strict stage order of the resolution chain.
    pub const ORDERED: [SearchStrategy; 4] = [
        SearchStrategy::Barcode,
        SearchStrategy::ExactCode,
        SearchStrategy::PartialCode,
        SearchStrategy::Name,
    ];

    /// Stable label, used in traces and result tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Barcode => "barcode",
            SearchStrategy::ExactCode => "exact_code",
            SearchStrategy::PartialCode => "partial_code",
            SearchStrategy::Name => "name",
        }
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Resolution Result
// =============================================================================

/// The outcome of one resolution call.
///
/// Constructed per request, never persisted. An empty result carries no
/// strategy tag - "not found" is a normal outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Products from the winning stage, most recently modified first.
    pub products: Vec<Product>,

    /// Which stage produced the products. `None` when nothing matched.
    pub strategy: Option<SearchStrategy>,
}

impl ResolutionResult {
    /// The empty result: no products, no strategy.
    pub fn empty() -> Self {
        ResolutionResult {
            products: Vec::new(),
            strategy: None,
        }
    }

    /// A non-empty result tagged with the stage that produced it.
    pub fn found(strategy: SearchStrategy, products: Vec<Product>) -> Self {
        ResolutionResult {
            products,
            strategy: Some(strategy),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Resolution Trace
// =============================================================================

/// What happened at a single stage of a traced resolution walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    /// The stage that ran.
    pub stage: SearchStrategy,

    /// How many products the stage returned.
    pub hits: usize,

    /// True when the catalog call failed and the stage was degraded to
    /// zero matches.
    pub failed: bool,
}

/// Full per-stage account of a resolution walk, for the debug endpoint.
///
/// Normal responses never carry this; diagnostic detail is only available
/// via the dedicated debug surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionTrace {
    /// The trimmed query that was resolved.
    pub query: String,

    /// One report per stage that actually ran. Stages after the winning
    /// one never run and never appear.
    pub stages: Vec<StageReport>,

    /// The result the caller would have received.
    pub result: ResolutionResult,
}

// =============================================================================
// Image Reference
// =============================================================================

/// Syntactic classification of a raw image reference, in rule order.
///
/// Derived from the raw string per call; not persisted. `FileRecordId` and
/// `Filename` overlap syntactically - a slash-free string is tried against
/// the file store first and treated as a bare filename when the lookup
/// misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageReference<'a> {
    /// Already an absolute URL (`http...`); returned unchanged.
    AbsoluteUrl(&'a str),

    /// Site-relative path with a leading slash; joined under the base URL.
    RelativePath(&'a str),

    /// Slash-free string: candidate file-record id, bare filename on miss.
    FileRecordId(&'a str),

    /// Relative path with separators but no leading slash.
    Filename(&'a str),
}

impl<'a> ImageReference<'a> {
    /// Classifies a non-empty, trimmed raw reference.
    pub fn classify(raw: &'a str) -> Self {
        if raw.starts_with("http") {
            ImageReference::AbsoluteUrl(raw)
        } else if raw.starts_with('/') {
            ImageReference::RelativePath(raw)
        } else if !raw.contains('/') {
            ImageReference::FileRecordId(raw)
        } else {
            ImageReference::Filename(raw)
        }
    }
}

// =============================================================================
// Principal & Permissions
// =============================================================================

/// The identity a request runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum Principal {
    /// Unauthenticated caller. Guests are denied everywhere.
    Guest,
    /// Named authenticated caller.
    User(String),
}

impl Principal {
    #[inline]
    pub fn is_guest(&self) -> bool {
        matches!(self, Principal::Guest)
    }
}

/// An action the permission gate can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
    Create,
    Delete,
}

/// Per-action permission echo for the calling principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_read_products: bool,
    pub can_write_products: bool,
    pub can_create_products: bool,
    pub can_delete_products: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
