use crate::catalog::Catalog;
use crate::error::StoreError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Cache {
    dir: PathBuf,
    read_enabled: bool,
}

const CATALOG_TTL: Duration = Duration::from_secs(60 * 60); // 1 hour

impl Cache {
    /// Create a cache. When `no_cache` is true, reads are skipped but writes still happen.
    pub fn new(cache_dir: PathBuf, no_cache: bool) -> Self {
        Self {
            dir: cache_dir,
            read_enabled: !no_cache,
        }
    }

    /// A fresh cached catalog for `url`. Stale, unreadable and invalid
    /// entries are misses; invalid ones are also removed.
    pub fn get_catalog(&self, url: &str) -> Option<Catalog> {
        if !self.read_enabled {
            return None;
        }
        let path = self.catalog_path(url);
        let content = fresh_content(&path, CATALOG_TTL)?;
        match Catalog::from_json(&content) {
            Ok(catalog) => {
                tracing::info!(
                    "Cache hit for {} ({} products)",
                    url,
                    catalog.products.len()
                );
                Some(catalog)
            }
            Err(e) => {
                tracing::warn!("Discarding cached catalog for {}: {}", url, e);
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::debug!("Failed to remove {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    pub fn set_catalog(&self, url: &str, catalog: &Catalog) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StoreError::Cache(format!("Failed to create cache dir: {}", e)))?;

        let path = self.catalog_path(url);
        // Readers only ever see a complete file.
        let partial = path.with_extension("json.partial");
        std::fs::write(&partial, serde_json::to_vec(catalog)?)
            .map_err(|e| StoreError::Cache(format!("Failed to write cache: {}", e)))?;
        std::fs::rename(&partial, &path)
            .map_err(|e| StoreError::Cache(format!("Failed to move cache entry: {}", e)))?;

        tracing::debug!(
            "Cached {} products for {} at {}",
            catalog.products.len(),
            url,
            path.display()
        );
        Ok(())
    }

    fn catalog_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("catalog_{}.json", cache_key(url)))
    }
}

fn fresh_content(path: &Path, ttl: Duration) -> Option<String> {
    let age = std::fs::metadata(path).ok()?.modified().ok()?.elapsed().ok()?;
    if age > ttl {
        tracing::debug!("Cache expired for {}", path.display());
        return None;
    }
    std::fs::read_to_string(path).ok()
}

fn cache_key(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..8])
}
