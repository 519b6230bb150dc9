//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::AssetKind;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("{0} downloads are disabled")]
    KindDisabled(AssetKind),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The engine hands every fetched document and downloaded asset to a `Store`
/// and records the returned location. Implementations must be shareable
/// across tasks.
#[async_trait]
pub trait Store: Send + Sync {
    /// Stores a fetched HTML document
    ///
    /// # Arguments
    ///
    /// * `url` - The normalized page URL; its path decides the location
    /// * `content` - The raw document text
    ///
    /// # Returns
    ///
    /// The path the document was written to
    async fn store_document(&self, url: &Url, content: &str) -> StorageResult<PathBuf>;

    /// Stores a downloaded asset
    ///
    /// # Arguments
    ///
    /// * `kind` - Image, stylesheet or script
    /// * `page_url` - The page that referenced the asset
    /// * `file_name` - File name chosen for the asset
    /// * `bytes` - The asset body
    ///
    /// # Returns
    ///
    /// The path the asset was written to
    async fn store_asset(
        &self,
        kind: AssetKind,
        page_url: &Url,
        file_name: &str,
        bytes: &[u8],
    ) -> StorageResult<PathBuf>;
}
