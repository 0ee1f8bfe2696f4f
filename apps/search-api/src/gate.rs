//! # Token Permission Gate
//!
//! Per-request [`PermissionGate`] built from the `Authorization` header.
//!
//! ## Access Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Who Gets In                                      │
//! │                                                                         │
//! │  SCOUT_API_TOKEN unset     ──► every caller is User("public")           │
//! │                                                                         │
//! │  SCOUT_API_TOKEN set:                                                   │
//! │    Bearer <matching token> ──► User("api-client"), read access          │
//! │    anything else           ──► Guest, denied everywhere (403)           │
//! │                                                                         │
//! │  The whole surface is read-only: no principal ever gets write,          │
//! │  create, or delete.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::{header, HeaderMap};
use tracing::debug;

use scout_core::{permission, Action, PermissionGate, Principal};

use crate::config::AppConfig;
use crate::error::ApiError;

/// Gate backed by the configured static bearer token.
#[derive(Debug)]
pub struct TokenGate {
    principal: Principal,
}

impl TokenGate {
    /// Builds a gate for the request described by `headers`.
    pub fn from_headers(config: &AppConfig, headers: &HeaderMap) -> Self {
        let principal = match &config.api_token {
            // No token configured: open access for local setups.
            None => Principal::User("public".to_string()),
            Some(expected) => {
                let presented = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "));
                match presented {
                    Some(token) if token == expected.as_str() => {
                        Principal::User("api-client".to_string())
                    }
                    Some(_) => {
                        debug!("authorization token mismatch, treating caller as guest");
                        Principal::Guest
                    }
                    None => Principal::Guest,
                }
            }
        };
        TokenGate { principal }
    }
}

impl PermissionGate for TokenGate {
    fn principal(&self) -> Principal {
        self.principal.clone()
    }

    fn can(&self, action: Action) -> bool {
        // Read-only surface: authenticated callers read, nobody writes.
        !self.principal.is_guest() && matches!(action, Action::Read)
    }
}

/// Builds the request's gate and rejects callers without app access.
pub fn require_access(config: &AppConfig, headers: &HeaderMap) -> Result<TokenGate, ApiError> {
    let gate = TokenGate::from_headers(config, headers);
    if !permission::has_app_access(&gate) {
        return Err(ApiError::forbidden());
    }
    Ok(gate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: Option<&str>) -> AppConfig {
        AppConfig {
            port: 0,
            database_path: ":memory:".to_string(),
            base_url: "https://shop.example.com".to_string(),
            api_token: token.map(str::to_string),
            search_limit: 20,
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        headers
    }

    #[test]
    fn test_open_access_when_no_token_configured() {
        let config = config_with_token(None);
        let gate = TokenGate::from_headers(&config, &HeaderMap::new());
        assert_eq!(gate.principal(), Principal::User("public".to_string()));
        assert!(require_access(&config, &HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_matching_token_is_authenticated() {
        let config = config_with_token(Some("s3cret"));
        let gate = TokenGate::from_headers(&config, &bearer("s3cret"));
        assert_eq!(gate.principal(), Principal::User("api-client".to_string()));
        assert!(gate.can(Action::Read));
        assert!(!gate.can(Action::Write));
    }

    #[test]
    fn test_missing_or_wrong_token_is_guest() {
        let config = config_with_token(Some("s3cret"));

        let gate = TokenGate::from_headers(&config, &HeaderMap::new());
        assert!(gate.principal().is_guest());

        let gate = TokenGate::from_headers(&config, &bearer("wrong"));
        assert!(gate.principal().is_guest());

        let err = require_access(&config, &bearer("wrong")).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Forbidden);
    }
}
