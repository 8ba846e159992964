//! Filtering, sorting and pagination over an in-memory product list.
//!
//! Everything here is pure: the same products and the same [`Query`] always
//! produce the same [`ResultPage`]. Invalid input never fails, it just yields
//! an empty page.

use crate::model::Product;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

pub const DEFAULT_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Popular,
    PriceLow,
    PriceHigh,
    /// Keeps the catalog order. Used for any key that isn't recognized.
    Unsorted,
}

impl SortKey {
    pub const ALL: &'static [SortKey] = &[
        SortKey::Newest,
        SortKey::Popular,
        SortKey::PriceLow,
        SortKey::PriceHigh,
    ];

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => SortKey::Newest,
            "popular" => SortKey::Popular,
            "price-low" => SortKey::PriceLow,
            "price-high" => SortKey::PriceHigh,
            other => {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                tracing::warn!(
                    "Unknown sort key '{}' (expected one of {}), keeping catalog order",
                    other,
                    known.join(", ")
                );
                SortKey::Unsorted
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Popular => "popular",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Unsorted => "unsorted",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Newest => b.id.cmp(&a.id),
            SortKey::Popular => b.rating.total_cmp(&a.rating),
            SortKey::PriceLow => a.price.total_cmp(&b.price),
            SortKey::PriceHigh => b.price.total_cmp(&a.price),
            SortKey::Unsorted => Ordering::Equal,
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSet {
    pub categories: BTreeSet<String>,
    pub price_range: Option<PriceRange>,
    pub brand: Option<String>,
    pub min_rating: Option<f64>,
}

impl FilterSet {
    /// True when the product passes every active filter.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok =
            self.categories.is_empty() || self.categories.contains(&product.category);
        let price_ok = self
            .price_range
            .map_or(true, |range| range.contains(product.price));
        let brand_ok = match self.brand.as_deref() {
            None | Some("") => true,
            Some(brand) => product.brand == brand,
        };
        let rating_ok = self.min_rating.map_or(true, |min| product.rating >= min);

        category_ok && price_ok && brand_ok && rating_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub page: u32,
    pub sort: SortKey,
    pub search: String,
    pub filters: FilterSet,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortKey::default(),
            search: String::new(),
            filters: FilterSet::default(),
        }
    }
}

impl Query {
    fn matches_search(&self, product: &Product) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        product.title.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product) && self.filters.matches(product)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultPage {
    pub products: Vec<Product>,
    pub total_pages: u32,
    pub total_matches: usize,
    pub page: u32,
    pub page_size: usize,
}

/// Run a query: filter, then stable-sort, then slice out the requested page.
pub fn query(products: &[Product], q: &Query, page_size: usize) -> ResultPage {
    let mut matched: Vec<&Product> = products.iter().filter(|p| q.matches(p)).collect();
    // sort_by is stable, so equal keys keep catalog order
    matched.sort_by(|a, b| q.sort.compare(a, b));

    let total_matches = matched.len();
    let total_pages = total_pages(total_matches, page_size);

    let page_products = if q.page == 0 || q.page > total_pages {
        Vec::new()
    } else {
        let start = (q.page as usize - 1) * page_size;
        matched
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect()
    };

    tracing::debug!(
        "Query matched {} products, page {}/{} holds {}",
        total_matches,
        q.page,
        total_pages,
        page_products.len()
    );

    ResultPage {
        products: page_products,
        total_pages,
        total_matches,
        page: q.page,
        page_size,
    }
}

fn total_pages(matches: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(matches.div_ceil(page_size)).unwrap_or(u32::MAX)
}
