//! # Image Reference Normalizer
//!
//! Turns the raw, possibly ambiguous `image` field of a product into a
//! resolvable absolute URL - or `None`, never an error. Image resolution
//! failures must never break product listing.
//!
//! ## Classification Rules (evaluated in order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw reference                          result                          │
//! │  ─────────────────────────────────────  ─────────────────────────────   │
//! │  None / ""                              None                            │
//! │  "https://cdn.example/a.png"            unchanged                       │
//! │  "/files/a.png", "/private/files/a"     base_url + raw                  │
//! │  "rec_9f2c"  (no slash)                 file record lookup:             │
//! │                                           hit  → resolve record URL     │
//! │                                           miss → base_url/files/raw     │
//! │  "shots/a.png" (relative w/ separator)  lookup miss → base_url/shots/…  │
//! │  "/misc/a.png" (unknown abs. path)      base_url + raw                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bare-filename fallback injects the `/files/` public-store prefix:
//! a bare filename is only meaningful inside the public file store, so the
//! prefixed form is the only one that can resolve.

use tracing::{debug, warn};

use crate::catalog::FileStore;
use crate::types::ImageReference;

/// Storage prefix assumed for bare filenames.
const PUBLIC_FILES_PREFIX: &str = "/files/";

/// Normalizes raw image references against a base URL and a file store.
///
/// ## Usage
/// ```rust,ignore
/// let normalizer = ImageNormalizer::new("https://shop.example", db.files());
/// let url = normalizer.normalize(product.image.as_deref()).await;
/// ```
#[derive(Debug, Clone)]
pub struct ImageNormalizer<F> {
    /// Site base URL without trailing slash.
    base_url: String,
    files: F,
}

impl<F: FileStore> ImageNormalizer<F> {
    /// Creates a normalizer. A trailing slash on `base_url` is stripped so
    /// joins are unambiguous.
    pub fn new(base_url: impl Into<String>, files: F) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        ImageNormalizer { base_url, files }
    }

    /// Normalizes a raw reference to an absolute URL.
    ///
    /// Total function: every input maps to `Some(url)` or `None`, even
    /// when the file store throws. Absolute URLs pass through unchanged,
    /// which makes normalization idempotent on its own output.
    pub async fn normalize(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }

        match ImageReference::classify(raw) {
            ImageReference::AbsoluteUrl(url) => Some(url.to_string()),
            ImageReference::RelativePath(path) => Some(format!("{}{}", self.base_url, path)),
            ImageReference::FileRecordId(id) => {
                if let Some(url) = self.resolve_record(id).await {
                    return Some(url);
                }
                // Not a record: treat as a bare filename in the public store.
                Some(format!("{}{}{}", self.base_url, PUBLIC_FILES_PREFIX, id))
            }
            ImageReference::Filename(path) => {
                if let Some(url) = self.resolve_record(path).await {
                    return Some(url);
                }
                Some(format!("{}/{}", self.base_url, path))
            }
        }
    }

    /// Tries to resolve a reference as a file-record id.
    ///
    /// Returns `None` on lookup miss, on a record without a URL, and on
    /// store failure - all three fall through to the caller's fallback.
    async fn resolve_record(&self, id: &str) -> Option<String> {
        let record = match self.files.get_record(id).await {
            Ok(record) => record?,
            Err(err) => {
                warn!(id = %id, error = %err, "file record lookup failed, falling through");
                return None;
            }
        };

        let url = record.file_url?;
        debug!(id = %id, url = %url, "resolved image via file record");

        if url.starts_with("http") {
            Some(url)
        } else if url.starts_with('/') {
            Some(format!("{}{}", self.base_url, url))
        } else {
            Some(format!("{}/{}", self.base_url, url))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, CatalogResult};
    use crate::types::FileRecord;
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeFileStore {
        records: HashMap<String, FileRecord>,
        failing: bool,
    }

    impl FakeFileStore {
        fn with_record(mut self, id: &str, file_url: Option<&str>) -> Self {
            self.records.insert(
                id.to_string(),
                FileRecord {
                    id: id.to_string(),
                    file_name: id.to_string(),
                    file_url: file_url.map(String::from),
                    is_private: false,
                },
            );
            self
        }

        fn failing() -> Self {
            FakeFileStore {
                failing: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl FileStore for FakeFileStore {
        async fn get_record(&self, id: &str) -> CatalogResult<Option<FileRecord>> {
            if self.failing {
                return Err(CatalogError::unavailable("file store down"));
            }
            Ok(self.records.get(id).cloned())
        }
    }

    fn normalizer(files: FakeFileStore) -> ImageNormalizer<FakeFileStore> {
        ImageNormalizer::new("https://shop.example", files)
    }

    #[tokio::test]
    async fn test_none_and_empty_map_to_none() {
        let n = normalizer(FakeFileStore::default());
        assert_eq!(n.normalize(None).await, None);
        assert_eq!(n.normalize(Some("")).await, None);
        assert_eq!(n.normalize(Some("   ")).await, None);
    }

    #[tokio::test]
    async fn test_absolute_url_unchanged_and_idempotent() {
        let n = normalizer(FakeFileStore::default());
        let first = n.normalize(Some("https://cdn.example/a.png")).await.unwrap();
        assert_eq!(first, "https://cdn.example/a.png");

        let second = n.normalize(Some(&first)).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_known_relative_prefixes_join_base_url() {
        let n = normalizer(FakeFileStore::default());
        assert_eq!(
            n.normalize(Some("/files/photo.jpg")).await.unwrap(),
            "https://shop.example/files/photo.jpg"
        );
        assert_eq!(
            n.normalize(Some("/private/files/photo.jpg")).await.unwrap(),
            "https://shop.example/private/files/photo.jpg"
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_on_base_url_is_stripped() {
        let n = ImageNormalizer::new("https://shop.example/", FakeFileStore::default());
        assert_eq!(
            n.normalize(Some("/files/a.png")).await.unwrap(),
            "https://shop.example/files/a.png"
        );
    }

    #[tokio::test]
    async fn test_file_record_with_relative_url() {
        let files = FakeFileStore::default().with_record("rec_9f2c", Some("/files/real.png"));
        let n = normalizer(files);
        assert_eq!(
            n.normalize(Some("rec_9f2c")).await.unwrap(),
            "https://shop.example/files/real.png"
        );
    }

    #[tokio::test]
    async fn test_file_record_with_absolute_url() {
        let files =
            FakeFileStore::default().with_record("rec_9f2c", Some("https://cdn.example/r.png"));
        let n = normalizer(files);
        assert_eq!(
            n.normalize(Some("rec_9f2c")).await.unwrap(),
            "https://cdn.example/r.png"
        );
    }

    #[tokio::test]
    async fn test_record_without_url_falls_back_to_filename() {
        let files = FakeFileStore::default().with_record("photo.jpg", None);
        let n = normalizer(files);
        assert_eq!(
            n.normalize(Some("photo.jpg")).await.unwrap(),
            "https://shop.example/files/photo.jpg"
        );
    }

    #[tokio::test]
    async fn test_bare_filename_gets_public_store_prefix() {
        let n = normalizer(FakeFileStore::default());
        assert_eq!(
            n.normalize(Some("photo.jpg")).await.unwrap(),
            "https://shop.example/files/photo.jpg"
        );
    }

    #[tokio::test]
    async fn test_relative_path_with_separator_joins_directly() {
        let n = normalizer(FakeFileStore::default());
        assert_eq!(
            n.normalize(Some("shots/a.png")).await.unwrap(),
            "https://shop.example/shots/a.png"
        );
    }

    #[tokio::test]
    async fn test_unknown_absolute_path_joins_base_url() {
        let n = normalizer(FakeFileStore::default());
        assert_eq!(
            n.normalize(Some("/misc/a.png")).await.unwrap(),
            "https://shop.example/misc/a.png"
        );
    }

    #[tokio::test]
    async fn test_total_even_when_file_store_throws() {
        // The lookup fails upstream; normalization degrades to the
        // filename fallback instead of erroring.
        let n = normalizer(FakeFileStore::failing());
        assert_eq!(
            n.normalize(Some("photo.jpg")).await.unwrap(),
            "https://shop.example/files/photo.jpg"
        );
    }
}
