use crate::cache::Cache;
use crate::error::StoreError;
use crate::model::{Category, CategorySummary, Product, ProductView};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use url::Url;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Where the product catalog comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
    Remote(Url),
}

impl CatalogSource {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("builtin") {
            return CatalogSource::Builtin;
        }
        match Url::parse(input) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                CatalogSource::Remote(url)
            }
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => CatalogSource::File(path),
                Err(_) => CatalogSource::File(PathBuf::from(input)),
            },
            _ => CatalogSource::File(PathBuf::from(input)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Builtin => write!(f, "builtin"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, StoreError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub async fn load(source: &CatalogSource, cache: &Cache) -> Result<Self, StoreError> {
        tracing::info!("Loading catalog from {}", source);
        match source {
            CatalogSource::Builtin => Self::builtin(),
            CatalogSource::File(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    StoreError::CatalogLoad(format!("{}: {}", path.display(), e))
                })?;
                Self::from_json(&content)
            }
            CatalogSource::Remote(url) => {
                if let Some(cached) = cache.get_catalog(url.as_str()) {
                    return Ok(cached);
                }
                let catalog = Self::fetch(url).await?;
                if let Err(e) = cache.set_catalog(url.as_str(), &catalog) {
                    tracing::debug!("Failed to cache catalog: {}", e);
                }
                Ok(catalog)
            }
        }
    }

    async fn fetch(url: &Url) -> Result<Self, StoreError> {
        let response = reqwest::get(url.clone()).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::CatalogLoad(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }
        let body = response.text().await?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Self::from_json(&body)
    }

    fn validate(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(product.id) {
                return Err(StoreError::InvalidCatalog(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(StoreError::InvalidCatalog(format!(
                    "product {} has invalid price {}",
                    product.id, product.price
                )));
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(StoreError::InvalidCatalog(format!(
                    "product {} has rating {} outside 0-5",
                    product.id, product.rating
                )));
            }
        }
        Ok(())
    }

    pub fn find(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products flagged for the front page, in catalog order.
    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.featured).collect()
    }

    /// Other products in the same category, in catalog order.
    pub fn related(&self, id: u64, limit: usize) -> Vec<&Product> {
        let Some(product) = self.find(id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| p.id != id && p.category == product.category)
            .take(limit)
            .collect()
    }

    pub fn view(&self, id: u64, related_limit: usize) -> Result<ProductView, StoreError> {
        let product = self.find(id).ok_or(StoreError::ProductNotFound(id))?;
        Ok(ProductView {
            product: product.clone(),
            related: self.related(id, related_limit).into_iter().cloned().collect(),
        })
    }

    /// Listed categories first, then any category only referenced by products.
    pub fn category_index(&self) -> Vec<CategorySummary> {
        let mut names: Vec<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
        for product in &self.products {
            if !names.contains(&product.category.as_str()) {
                names.push(&product.category);
            }
        }

        names
            .into_iter()
            .map(|name| {
                let description = self
                    .categories
                    .iter()
                    .find(|c| c.name == name)
                    .map(|c| c.description.clone())
                    .filter(|d| !d.is_empty());
                CategorySummary {
                    name: name.to_string(),
                    description,
                    product_count: self.products.iter().filter(|p| p.category == name).count(),
                }
            })
            .collect()
    }
}
