//! # Repository Module
//!
//! Database repository implementations for Scout.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Repositories abstract database access behind a clean API, and ALSO    │
//! │  implement the scout-core collaborator traits - so the resolver can    │
//! │  run against SQLite in production and in-memory fakes in tests         │
//! │  without noticing the difference.                                      │
//! │                                                                         │
//! │  Resolver (scout-core)                                                 │
//! │       │  catalog.find_by_code("ITM-001", 5)                            │
//! │       ▼                                                                 │
//! │  ProductRepository ── SQL ──► SQLite                                   │
//! │                                                                         │
//! │  ImageNormalizer (scout-core)                                          │
//! │       │  files.get_record("rec_9f2c")                                  │
//! │       ▼                                                                 │
//! │  FileRepository ───── SQL ──► SQLite                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog queries and the barcode index
//! - [`file::FileRepository`] - stored-file metadata lookups

pub mod file;
pub mod product;
