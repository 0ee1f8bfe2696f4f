//! # Product Resolver
//!
//! The unified multi-strategy resolution chain, plus the bulk union search
//! used for listing-style queries.
//!
//! ## Resolution Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Resolution Works                                 │
//! │                                                                         │
//! │  User scans/types: "8851234567890"                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Stage 1: barcode index ──► hit? ──► return, tagged `barcode`          │
//! │       │ miss or failure                                                 │
//! │       ▼                                                                 │
//! │  Stage 2: exact code ─────► hit? ──► return, tagged `exact_code`       │
//! │       │ miss or failure                                                 │
//! │       ▼                                                                 │
//! │  Stage 3: partial code ───► hit? ──► return, tagged `partial_code`     │
//! │       │ miss or failure                                                 │
//! │       ▼                                                                 │
//! │  Stage 4: name ───────────► hit? ──► return, tagged `name`             │
//! │       │ miss or failure                                                 │
//! │       ▼                                                                 │
//! │  Empty result (NOT an error)                                           │
//! │                                                                         │
//! │  A stage only runs when every prior stage returned zero matches.       │
//! │  A failing stage is logged, degraded to zero matches, and the walk     │
//! │  continues - one sick index must never take resolution down.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Search Behaviors
//! `resolve` is the point lookup used by scanning flows: strict stage order,
//! first match wins. `search` is the listing search: name and code substring
//! queries run independently, results are unioned and deduplicated. They
//! coexist as distinct operations with distinct semantics.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::types::{Product, ResolutionResult, ResolutionTrace, SearchStrategy, StageReport};
use crate::{MIN_SEARCH_QUERY_LEN, STAGE_LIMIT};

/// Multi-strategy product resolver over an injected catalog.
///
/// ## Usage
/// ```rust,ignore
/// let resolver = Resolver::new(db.products());
///
/// let result = resolver.resolve("8851234567890").await;
/// if let Some(strategy) = result.strategy {
///     println!("matched via {strategy}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<C> {
    catalog: C,
}

impl<C: Catalog> Resolver<C> {
    /// Creates a resolver over the given catalog.
    pub fn new(catalog: C) -> Self {
        Resolver { catalog }
    }

    /// Access to the underlying catalog, for adapters that need
    /// pass-through queries (listing, detail).
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Resolves a raw query to the first non-empty stage result.
    ///
    /// ## Guarantees
    /// - Empty/whitespace query returns empty immediately, no catalog access
    /// - Stages run in strict order; the first hit short-circuits the rest
    /// - Never returns an error: upstream failures degrade to zero matches
    pub async fn resolve(&self, query: &str) -> ResolutionResult {
        self.resolve_traced(query).await.result
    }

    /// Resolves like [`resolve`](Self::resolve) while recording what every
    /// stage did. Consumed by the diagnostic endpoint only.
    pub async fn resolve_traced(&self, query: &str) -> ResolutionTrace {
        let query = query.trim();

        let mut trace = ResolutionTrace {
            query: query.to_string(),
            stages: Vec::new(),
            result: ResolutionResult::empty(),
        };

        if query.is_empty() {
            debug!("resolve: empty query, skipping catalog");
            return trace;
        }

        for stage in SearchStrategy::ORDERED {
            match self.run_stage(stage, query).await {
                Ok(products) if !products.is_empty() => {
                    debug!(stage = %stage, hits = products.len(), query = %query, "resolve: stage matched");
                    trace.stages.push(StageReport {
                        stage,
                        hits: products.len(),
                        failed: false,
                    });
                    trace.result = ResolutionResult::found(stage, products);
                    return trace;
                }
                Ok(_) => {
                    trace.stages.push(StageReport {
                        stage,
                        hits: 0,
                        failed: false,
                    });
                }
                Err(err) => {
                    // Degraded, not fatal: the next stage still gets its turn.
                    warn!(stage = %stage, query = %query, error = %err, "resolve: stage failed, continuing");
                    trace.stages.push(StageReport {
                        stage,
                        hits: 0,
                        failed: true,
                    });
                }
            }
        }

        debug!(query = %query, "resolve: no stage matched");
        trace
    }

    /// Runs a single stage against the catalog.
    async fn run_stage(&self, stage: SearchStrategy, query: &str) -> CatalogResult<Vec<Product>> {
        match stage {
            SearchStrategy::Barcode => {
                let owners = self.catalog.owners_of_barcode(query, STAGE_LIMIT).await?;
                if owners.is_empty() {
                    return Ok(Vec::new());
                }
                self.catalog.find_by_ids(&owners, STAGE_LIMIT).await
            }
            SearchStrategy::ExactCode => self.catalog.find_by_code(query, STAGE_LIMIT).await,
            SearchStrategy::PartialCode => {
                self.catalog.find_by_code_fragment(query, STAGE_LIMIT).await
            }
            SearchStrategy::Name => self.catalog.find_by_name_fragment(query, STAGE_LIMIT).await,
        }
    }

    /// Bulk search for listing/paging: union of name and code substring
    /// matches, deduplicated by product id.
    ///
    /// ## How It Works
    /// 1. Name and code queries each fetch at most `limit / 2`
    /// 2. Results are concatenated name-first
    /// 3. Duplicates keep their first-seen position
    /// 4. The union is truncated to `limit`
    ///
    /// A failed half is logged and contributes nothing; the other half
    /// still counts. Queries shorter than two characters return empty
    /// without touching the catalog, as does a zero limit.
    pub async fn search(&self, query: &str, limit: u32) -> Vec<Product> {
        let query = query.trim();

        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            debug!(query = %query, "search: query below minimum length");
            return Vec::new();
        }
        if limit == 0 {
            return Vec::new();
        }

        let half = (limit / 2).max(1);

        let by_name = match self.catalog.find_by_name_fragment(query, half).await {
            Ok(products) => products,
            Err(err) => {
                warn!(query = %query, error = %err, "search: name query failed, degrading to empty");
                Vec::new()
            }
        };

        let by_code = match self.catalog.find_by_code_fragment(query, half).await {
            Ok(products) => products,
            Err(err) => {
                warn!(query = %query, error = %err, "search: code query failed, degrading to empty");
                Vec::new()
            }
        };

        debug!(
            by_name = by_name.len(),
            by_code = by_code.len(),
            query = %query,
            "search: merging halves"
        );

        let mut seen = std::collections::HashSet::new();
        let mut merged = Vec::new();
        for product in by_name.into_iter().chain(by_code) {
            if merged.len() as u32 >= limit {
                break;
            }
            if seen.insert(product.id.clone()) {
                merged.push(product);
            }
        }

        merged
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn product(id: &str, code: &str, name: &str) -> Product {
        Product {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            description: None,
            price_cents: 500,
            image: None,
            category: None,
            unit: "Unit".into(),
            disabled: false,
            track_stock: true,
            current_stock: Some(10),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// In-memory catalog with per-method call counters, so tests can prove
    /// which stages ran.
    #[derive(Default)]
    struct FakeCatalog {
        products: Vec<Product>,
        barcodes: HashMap<String, String>,
        /// Stages that fail with an upstream error instead of answering.
        failing: Mutex<Vec<&'static str>>,
        calls_barcode: AtomicUsize,
        calls_by_ids: AtomicUsize,
        calls_code: AtomicUsize,
        calls_code_fragment: AtomicUsize,
        calls_name_fragment: AtomicUsize,
    }

    impl FakeCatalog {
        fn with_products(products: Vec<Product>) -> Self {
            FakeCatalog {
                products,
                ..Default::default()
            }
        }

        fn with_barcode(mut self, barcode: &str, product_id: &str) -> Self {
            self.barcodes.insert(barcode.into(), product_id.into());
            self
        }

        fn failing_on(self, methods: &[&'static str]) -> Self {
            *self.failing.lock().unwrap() = methods.to_vec();
            self
        }

        fn check_failure(&self, method: &'static str) -> CatalogResult<()> {
            if self.failing.lock().unwrap().contains(&method) {
                Err(CatalogError::query(format!("{method} exploded")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn owners_of_barcode(
            &self,
            barcode: &str,
            _limit: u32,
        ) -> CatalogResult<Vec<String>> {
            self.calls_barcode.fetch_add(1, Ordering::SeqCst);
            self.check_failure("barcode")?;
            Ok(self.barcodes.get(barcode).cloned().into_iter().collect())
        }

        async fn find_by_ids(&self, ids: &[String], limit: u32) -> CatalogResult<Vec<Product>> {
            self.calls_by_ids.fetch_add(1, Ordering::SeqCst);
            self.check_failure("by_ids")?;
            Ok(self
                .products
                .iter()
                .filter(|p| ids.contains(&p.id))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn find_by_code(&self, code: &str, limit: u32) -> CatalogResult<Vec<Product>> {
            self.calls_code.fetch_add(1, Ordering::SeqCst);
            self.check_failure("code")?;
            Ok(self
                .products
                .iter()
                .filter(|p| p.code == code)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn find_by_code_fragment(
            &self,
            fragment: &str,
            limit: u32,
        ) -> CatalogResult<Vec<Product>> {
            self.calls_code_fragment.fetch_add(1, Ordering::SeqCst);
            self.check_failure("code_fragment")?;
            Ok(self
                .products
                .iter()
                .filter(|p| p.code.contains(fragment))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn find_by_name_fragment(
            &self,
            fragment: &str,
            limit: u32,
        ) -> CatalogResult<Vec<Product>> {
            self.calls_name_fragment.fetch_add(1, Ordering::SeqCst);
            self.check_failure("name_fragment")?;
            Ok(self
                .products
                .iter()
                .filter(|p| p.name.contains(fragment))
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn list(&self, limit: u32, offset: u32) -> CatalogResult<Vec<Product>> {
            Ok(self
                .products
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn get(&self, id: &str) -> CatalogResult<Option<Product>> {
            Ok(self.products.iter().find(|p| p.id == id).cloned())
        }

        async fn count(&self) -> CatalogResult<i64> {
            Ok(self.products.len() as i64)
        }
    }

    #[tokio::test]
    async fn test_barcode_match_wins_and_short_circuits() {
        // The product would ALSO match by code and name; barcode must win.
        let catalog = FakeCatalog::with_products(vec![product("p1", "8851234567890", "8851234567890 Cola")])
            .with_barcode("8851234567890", "p1");
        let resolver = Resolver::new(catalog);

        let result = resolver.resolve("8851234567890").await;

        assert_eq!(result.strategy, Some(SearchStrategy::Barcode));
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].id, "p1");

        // Later stages never ran.
        let catalog = resolver.catalog();
        assert_eq!(catalog.calls_barcode.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.calls_by_ids.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.calls_code.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.calls_code_fragment.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.calls_name_fragment.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exact_code_when_no_barcode() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Cola")]);
        let resolver = Resolver::new(catalog);

        let result = resolver.resolve("ITM-001").await;

        assert_eq!(result.strategy, Some(SearchStrategy::ExactCode));
        assert_eq!(result.products[0].code, "ITM-001");
    }

    #[tokio::test]
    async fn test_partial_code_after_exact_miss() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Cola")]);
        let resolver = Resolver::new(catalog);

        let result = resolver.resolve("TM-0").await;

        assert_eq!(result.strategy, Some(SearchStrategy::PartialCode));
    }

    #[tokio::test]
    async fn test_name_stage_is_last_resort() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Sparkling Water")]);
        let resolver = Resolver::new(catalog);

        let result = resolver.resolve("Sparkling").await;

        assert_eq!(result.strategy, Some(SearchStrategy::Name));
    }

    #[tokio::test]
    async fn test_no_match_returns_empty_not_error() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Cola")]);
        let resolver = Resolver::new(catalog);

        let result = resolver.resolve("zzz-nothing").await;

        assert!(result.is_empty());
        assert!(result.strategy.is_none());
    }

    #[tokio::test]
    async fn test_empty_query_never_touches_catalog() {
        let resolver = Resolver::new(FakeCatalog::default());

        let result = resolver.resolve("   ").await;

        assert!(result.is_empty());
        let catalog = resolver.catalog();
        assert_eq!(catalog.calls_barcode.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.calls_code.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.calls_code_fragment.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.calls_name_fragment.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_stage_falls_through_to_next() {
        // Barcode index is down; the exact-code stage still answers.
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Cola")])
            .failing_on(&["barcode"]);
        let resolver = Resolver::new(catalog);

        let result = resolver.resolve("ITM-001").await;

        assert_eq!(result.strategy, Some(SearchStrategy::ExactCode));
    }

    #[tokio::test]
    async fn test_all_stages_failing_returns_empty() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Cola")])
            .failing_on(&["barcode", "code", "code_fragment", "name_fragment"]);
        let resolver = Resolver::new(catalog);

        let result = resolver.resolve("ITM-001").await;

        assert!(result.is_empty());
        assert!(result.strategy.is_none());
    }

    #[tokio::test]
    async fn test_trace_records_losing_and_winning_stages() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Cola")])
            .failing_on(&["barcode"]);
        let resolver = Resolver::new(catalog);

        let trace = resolver.resolve_traced("ITM-001").await;

        assert_eq!(trace.query, "ITM-001");
        assert_eq!(trace.stages.len(), 2);
        assert_eq!(trace.stages[0].stage, SearchStrategy::Barcode);
        assert!(trace.stages[0].failed);
        assert_eq!(trace.stages[1].stage, SearchStrategy::ExactCode);
        assert_eq!(trace.stages[1].hits, 1);
        assert_eq!(trace.result.strategy, Some(SearchStrategy::ExactCode));
    }

    #[tokio::test]
    async fn test_bulk_search_dedups_overlap_at_first_seen_position() {
        // "Cola" matches p1 by name AND by code fragment; it must appear
        // exactly once, in its name-half position.
        let catalog = FakeCatalog::with_products(vec![
            product("p1", "Cola-1", "Cola Classic"),
            product("p2", "ITM-002", "Cola Zero"),
        ]);
        let resolver = Resolver::new(catalog);

        let results = resolver.search("Cola", 20).await;

        let ids: Vec<&str> = results.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_bulk_search_truncates_to_limit() {
        let products: Vec<Product> = (0..10)
            .map(|i| product(&format!("p{i}"), &format!("COLA-{i}"), &format!("Cola {i}")))
            .collect();
        let resolver = Resolver::new(FakeCatalog::with_products(products));

        let results = resolver.search("Cola", 4).await;

        assert!(results.len() <= 4);
    }

    #[tokio::test]
    async fn test_bulk_search_limit_zero_returns_nothing() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "COLA-1", "Cola Classic")]);
        let resolver = Resolver::new(catalog);

        let results = resolver.search("Cola", 0).await;

        assert!(results.is_empty());
        // Nothing to fetch, so neither half runs.
        assert_eq!(
            resolver.catalog().calls_name_fragment.load(Ordering::SeqCst),
            0
        );
        assert_eq!(
            resolver.catalog().calls_code_fragment.load(Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn test_bulk_search_rejects_short_query() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "C", "C")]);
        let resolver = Resolver::new(catalog);

        let results = resolver.search("C", 20).await;

        assert!(results.is_empty());
        assert_eq!(
            resolver.catalog().calls_name_fragment.load(Ordering::SeqCst),
            0
        );
    }

    #[tokio::test]
    async fn test_bulk_search_survives_one_failing_half() {
        let catalog = FakeCatalog::with_products(vec![product("p1", "ITM-001", "Cola Classic")])
            .failing_on(&["code_fragment"]);
        let resolver = Resolver::new(catalog);

        let results = resolver.search("Cola", 20).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p1");
    }
}
