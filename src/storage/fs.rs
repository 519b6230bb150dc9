use crate::config::{AssetSettings, CrawlSettings};
use crate::storage::traits::{Store, StorageError, StorageResult};
use crate::storage::{document_path, page_dir_name, AssetKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

/// Filesystem-backed store
///
/// Documents go under `output_dir` following the URL path. Assets go under
/// the directory configured for their kind, in a sub-directory named after
/// the page that referenced them.
#[derive(Debug, Clone)]
pub struct FileStore {
    output_dir: PathBuf,
    assets: AssetSettings,
}

impl FileStore {
    pub fn new(output_dir: impl Into<PathBuf>, assets: AssetSettings) -> Self {
        Self {
            output_dir: output_dir.into(),
            assets,
        }
    }

    /// Builds a store from crawl settings
    pub fn from_settings(settings: &CrawlSettings) -> Self {
        Self::new(settings.output_dir.clone(), settings.assets.clone())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl Store for FileStore {
    async fn store_document(&self, url: &Url, content: &str) -> StorageResult<PathBuf> {
        let path = document_path(&self.output_dir, url);
        write_file(&path, content.as_bytes()).await?;
        tracing::trace!("Stored document {} at {}", url, path.display());
        Ok(path)
    }

    async fn store_asset(
        &self,
        kind: AssetKind,
        page_url: &Url,
        file_name: &str,
        bytes: &[u8],
    ) -> StorageResult<PathBuf> {
        let root = self
            .assets
            .dir_for(kind)
            .ok_or(StorageError::KindDisabled(kind))?;

        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            return Err(StorageError::InvalidPath(file_name.to_string()));
        }

        let path = root.join(page_dir_name(page_url)).join(file_name);
        write_file(&path, bytes).await?;
        Ok(path)
    }
}

/// Writes a file, creating its parent directories first
async fn write_file(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let io_error = |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, bytes).await.map_err(io_error)
}
