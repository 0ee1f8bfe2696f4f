//! # scout-db: Database Layer for Scout
//!
//! This crate provides database access for the Scout product lookup service.
//! It uses SQLite for local storage with sqlx for async operations, and
//! implements the collaborator traits scout-core resolves through.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Scout Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (resolve_products)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  scout_core::Resolver ── Catalog trait ──┐                             │
//! │                                          ▼                             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     scout-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (product.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ FileRepo      │    │              │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (./scout.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, file)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scout_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/scout.db")).await?;
//!
//! // Repositories implement the scout-core collaborator traits
//! let resolver = scout_core::Resolver::new(db.products());
//! let result = resolver.resolve("8851234567890").await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::file::FileRepository;
pub use repository::product::ProductRepository;
