//! # Shared Application State
//!
//! One [`AppState`] is built at startup and shared across handlers via
//! `Arc`. Handlers assemble their core collaborators from it per request;
//! the resolver and normalizer are cheap wrappers over the pooled database.

use scout_core::{ImageNormalizer, Resolver};
use scout_db::{Database, FileRepository, ProductRepository};

use crate::config::AppConfig;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState { db, config }
    }

    /// A resolver over the product catalog.
    pub fn resolver(&self) -> Resolver<ProductRepository> {
        Resolver::new(self.db.products())
    }

    /// An image normalizer rooted at the configured base URL.
    pub fn normalizer(&self) -> ImageNormalizer<FileRepository> {
        ImageNormalizer::new(self.config.base_url.clone(), self.db.files())
    }
}
