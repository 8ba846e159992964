use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load catalog: {0}")]
    CatalogLoad(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
