//! # Product Endpoints
//!
//! Handlers for listing, search, resolution, code/barcode lookup, product
//! detail, and the permission echo.
//!
//! ## Degradation Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               When the Catalog Misbehaves                               │
//! │                                                                         │
//! │  list / search / resolve / by-code  ──►  empty result set, 200         │
//! │  by-barcode                         ──►  treated as a miss, 404        │
//! │  detail                             ──►  500 (a point read must not    │
//! │                                          lie about existence)          │
//! │                                                                         │
//! │  Every degraded call is logged with the underlying error.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never run resolution logic themselves: they trim input, call
//! into scout-core, and shape the JSON on the way out.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use scout_core::{permission, Permissions, Principal, Product, SearchStrategy};

use crate::error::ApiError;
use crate::gate::require_access;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// A product as the API presents it: raw image reference already
/// normalized to an absolute URL (or dropped when unresolvable).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image: Option<String>,
    pub category: Option<String>,
    pub unit: String,
    pub current_stock: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDto {
    fn from_parts(product: Product, image: Option<String>) -> Self {
        ProductDto {
            id: product.id,
            code: product.code,
            name: product.name,
            description: product.description,
            price_cents: product.price_cents,
            image,
            category: product.category,
            unit: product.unit,
            current_stock: product.current_stock,
            updated_at: product.updated_at,
        }
    }
}

/// Response of the unified resolution endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub products: Vec<ProductDto>,
    /// The stage that produced the products; absent when nothing matched.
    pub strategy: Option<SearchStrategy>,
}

/// Response of the permission echo endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsResponse {
    pub principal: Principal,
    pub permissions: Permissions,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// The search/resolution query. `q` is accepted as shorthand.
    #[serde(default, alias = "q")]
    pub query: String,
    pub limit: Option<u32>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products` - paged listing of listable products, most recently
/// modified first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    require_access(&state.config, &headers)?;

    let limit = clamp_limit(params.limit, &state);
    let offset = params.offset.unwrap_or(0);

    let products = match state.db.products().page(limit, offset).await {
        Ok(products) => products,
        Err(err) => {
            warn!(error = %err, "list: page query failed, degrading to empty");
            Vec::new()
        }
    };

    Ok(Json(present(products, &state).await))
}

/// `GET /api/products/search?q=...` - bulk union search over name and code
/// substrings.
pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    require_access(&state.config, &headers)?;

    let limit = clamp_limit(params.limit, &state);
    let products = state.resolver().search(&params.query, limit).await;

    Ok(Json(present(products, &state).await))
}

/// `GET /api/products/resolve?q=...` - the multi-stage point lookup used by
/// scanning flows. An empty result is a normal 200, never an error.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Json<ResolveResponse>, ApiError> {
    require_access(&state.config, &headers)?;

    let result = state.resolver().resolve(&params.query).await;
    debug!(
        query = %params.query.trim(),
        strategy = ?result.strategy,
        hits = result.products.len(),
        "resolve endpoint"
    );

    Ok(Json(ResolveResponse {
        strategy: result.strategy,
        products: present(result.products, &state).await,
    }))
}

/// `GET /api/products/by-code/{code}` - exact business-code match, falling
/// back to a substring match when nothing matches exactly.
pub async fn by_code(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    require_access(&state.config, &headers)?;

    let code = code.trim();
    if code.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let repo = state.db.products();
    let limit = scout_core::STAGE_LIMIT;

    let exact = match repo.by_code(code, limit).await {
        Ok(products) => products,
        Err(err) => {
            warn!(code = %code, error = %err, "by-code: exact query failed, degrading to empty");
            Vec::new()
        }
    };
    if !exact.is_empty() {
        return Ok(Json(present(exact, &state).await));
    }

    let partial = match repo.by_code_like(code, limit).await {
        Ok(products) => products,
        Err(err) => {
            warn!(code = %code, error = %err, "by-code: partial query failed, degrading to empty");
            Vec::new()
        }
    };

    Ok(Json(present(partial, &state).await))
}

/// `GET /api/products/by-barcode/{barcode}` - barcode index lookup with a
/// business-code fallback. Returns the single best match or 404.
pub async fn by_barcode(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(barcode): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    require_access(&state.config, &headers)?;

    let barcode = barcode.trim();
    if barcode.is_empty() {
        return Err(ApiError::validation("Barcode must not be empty"));
    }

    let repo = state.db.products();

    // Barcode index first. A failed lookup is a miss, not a 500: the code
    // fallback below still gets its turn.
    let owners = match repo.barcode_owners(barcode, 1).await {
        Ok(owners) => owners,
        Err(err) => {
            warn!(barcode = %barcode, error = %err, "by-barcode: index lookup failed, trying code fallback");
            Vec::new()
        }
    };
    if !owners.is_empty() {
        match repo.by_ids(&owners, 1).await {
            Ok(mut products) if !products.is_empty() => {
                return Ok(Json(present_one(products.remove(0), &state).await));
            }
            Ok(_) => {}
            Err(err) => {
                warn!(barcode = %barcode, error = %err, "by-barcode: owner fetch failed, trying code fallback");
            }
        }
    }

    // Cheap scanners often emit the business code instead of an EAN.
    match repo.by_code(barcode, 1).await {
        Ok(mut products) if !products.is_empty() => {
            Ok(Json(present_one(products.remove(0), &state).await))
        }
        Ok(_) => Err(ApiError::not_found("Product", barcode)),
        Err(err) => {
            warn!(barcode = %barcode, error = %err, "by-barcode: code fallback failed");
            Err(ApiError::not_found("Product", barcode))
        }
    }
}

/// `GET /api/products/{id}` - product detail by id.
///
/// Disabled products 404 like missing ones; untracked products stay
/// visible here even though resolution ignores them.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    require_access(&state.config, &headers)?;

    let product = state.db.products().fetch(&id).await?;
    match product {
        Some(product) if !product.disabled => Ok(Json(present_one(product, &state).await)),
        Some(_) => Err(ApiError::not_found("Product", &id)),
        None => Err(ApiError::not_found("Product", &id)),
    }
}

/// `GET /api/permissions` - echo of what the calling principal may do.
pub async fn permissions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PermissionsResponse>, ApiError> {
    let gate = require_access(&state.config, &headers)?;

    Ok(Json(PermissionsResponse {
        principal: permission::current_principal(&gate),
        permissions: permission::user_permissions(&gate),
    }))
}

// =============================================================================
// Helpers
// =============================================================================

fn clamp_limit(requested: Option<u32>, state: &AppState) -> u32 {
    requested
        .unwrap_or(state.config.search_limit)
        .clamp(1, scout_core::MAX_SEARCH_LIMIT)
}

/// Normalizes image references and shapes products for the wire.
pub(crate) async fn present(products: Vec<Product>, state: &AppState) -> Vec<ProductDto> {
    let normalizer = state.normalizer();
    let mut out = Vec::with_capacity(products.len());
    for product in products {
        let image = normalizer.normalize(product.image.as_deref()).await;
        out.push(ProductDto::from_parts(product, image));
    }
    out
}

async fn present_one(product: Product, state: &AppState) -> ProductDto {
    let normalizer = state.normalizer();
    let image = normalizer.normalize(product.image.as_deref()).await;
    ProductDto::from_parts(product, image)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::test_support::{memory_state, memory_state_with_token};
    use chrono::Duration;

    fn product(code: &str, name: &str, minutes_old: i64) -> Product {
        let ts = Utc::now() - Duration::minutes(minutes_old);
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            price_cents: 1500,
            image: None,
            category: Some("Beverages".to_string()),
            unit: "Unit".to_string(),
            disabled: false,
            track_stock: true,
            current_stock: Some(10),
            created_at: ts,
            updated_at: ts,
        }
    }

    async fn seed(state: &AppState, products: &[Product]) {
        let repo = state.db.products();
        for p in products {
            repo.insert(p).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_returns_recent_first() {
        let state = memory_state().await;
        seed(
            &state,
            &[
                product("COLA-1", "Cola Can", 30),
                product("COLA-2", "Cola Bottle", 5),
            ],
        )
        .await;

        let Json(listed) = list(
            State(state.clone()),
            HeaderMap::new(),
            Query(PageParams::default()),
        )
        .await
        .unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].code, "COLA-2");
    }

    #[tokio::test]
    async fn test_list_rejects_guest_when_token_configured() {
        let state = memory_state_with_token(Some("s3cret")).await;

        let err = list(
            State(state.clone()),
            HeaderMap::new(),
            Query(PageParams::default()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_search_unions_name_and_code_matches() {
        let state = memory_state().await;
        seed(
            &state,
            &[
                product("COLA-1", "Cola Can", 1),
                product("SNK-7", "Cola Gummies", 2),
                product("TEA-1", "Green Tea", 3),
            ],
        )
        .await;

        let Json(found) = search(
            State(state.clone()),
            HeaderMap::new(),
            Query(QueryParams {
                query: "cola".to_string(),
                limit: None,
            }),
        )
        .await
        .unwrap();

        let codes: Vec<&str> = found.iter().map(|p| p.code.as_str()).collect();
        assert!(codes.contains(&"COLA-1"));
        assert!(codes.contains(&"SNK-7"));
        assert!(!codes.contains(&"TEA-1"));
    }

    #[tokio::test]
    async fn test_resolve_tags_barcode_stage() {
        let state = memory_state().await;
        let p = product("COLA-1", "Cola Can", 1);
        seed(&state, std::slice::from_ref(&p)).await;
        state
            .db
            .products()
            .add_barcode("8851234567890", &p.id)
            .await
            .unwrap();

        let Json(resolved) = resolve(
            State(state.clone()),
            HeaderMap::new(),
            Query(QueryParams {
                query: "8851234567890".to_string(),
                limit: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(resolved.strategy, Some(SearchStrategy::Barcode));
        assert_eq!(resolved.products.len(), 1);
        assert_eq!(resolved.products[0].code, "COLA-1");
    }

    #[tokio::test]
    async fn test_by_code_falls_back_to_partial_match() {
        let state = memory_state().await;
        seed(
            &state,
            &[
                product("COLA-100", "Cola Can", 1),
                product("COLA-200", "Cola Bottle", 2),
            ],
        )
        .await;

        // Exact match wins alone.
        let Json(exact) = by_code(
            State(state.clone()),
            HeaderMap::new(),
            Path("COLA-100".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(exact.len(), 1);

        // No exact match: substring fallback returns both.
        let Json(partial) = by_code(
            State(state.clone()),
            HeaderMap::new(),
            Path("COLA".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(partial.len(), 2);
    }

    #[tokio::test]
    async fn test_by_barcode_prefers_index_then_code() {
        let state = memory_state().await;
        let scanned = product("COLA-1", "Cola Can", 1);
        let typed = product("COLA-2", "Cola Bottle", 2);
        seed(&state, &[scanned.clone(), typed.clone()]).await;
        state
            .db
            .products()
            .add_barcode("8850000000001", &scanned.id)
            .await
            .unwrap();

        let Json(via_index) = by_barcode(
            State(state.clone()),
            HeaderMap::new(),
            Path("8850000000001".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(via_index.id, scanned.id);

        let Json(via_code) = by_barcode(
            State(state.clone()),
            HeaderMap::new(),
            Path("COLA-2".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(via_code.id, typed.id);

        let err = by_barcode(
            State(state.clone()),
            HeaderMap::new(),
            Path("0000000000000".to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_detail_hides_disabled_products() {
        let state = memory_state().await;
        let visible = product("COLA-1", "Cola Can", 1);
        let mut hidden = product("COLA-2", "Cola Bottle", 2);
        hidden.disabled = true;
        seed(&state, &[visible.clone(), hidden.clone()]).await;

        let Json(got) = detail(
            State(state.clone()),
            HeaderMap::new(),
            Path(visible.id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(got.code, "COLA-1");

        let err = detail(
            State(state.clone()),
            HeaderMap::new(),
            Path(hidden.id.clone()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_permissions_echo_is_read_only() {
        let state = memory_state().await;

        let Json(echo) = permissions(State(state.clone()), HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(echo.principal, Principal::User("public".to_string()));
        assert!(echo.permissions.can_read_products);
        assert!(!echo.permissions.can_write_products);
        assert!(!echo.permissions.can_create_products);
        assert!(!echo.permissions.can_delete_products);
    }

    #[tokio::test]
    async fn test_dto_carries_normalized_image() {
        let state = memory_state().await;
        let mut p = product("COLA-1", "Cola Can", 1);
        p.image = Some("/files/cola.png".to_string());
        seed(&state, std::slice::from_ref(&p)).await;

        let Json(listed) = list(
            State(state.clone()),
            HeaderMap::new(),
            Query(PageParams::default()),
        )
        .await
        .unwrap();

        assert_eq!(
            listed[0].image.as_deref(),
            Some("https://shop.example.com/files/cola.png")
        );
    }
}
