use crate::parse;
use crate::query::{FilterSet, PriceRange, Query, SortKey};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "storefront",
    version,
    about = "Browse and query a storefront product catalog from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog to read: "builtin", a JSON file path, or an http(s) URL
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Products per page (default: 6)
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Bypass the local cache for remote catalogs
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Print JSON instead of Markdown
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List products, filtered, sorted and paginated
    Products(ProductsArgs),

    /// Show one product with related products from the same category
    Product {
        /// Numeric product ID or a /products/<id> URL
        #[arg(value_parser = parse::product_identifier)]
        id_or_url: u64,
    },

    /// List categories with product counts
    Categories,

    /// List the featured products from the storefront front page
    Featured,
}

#[derive(Args, Debug, Clone)]
pub struct ProductsArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Sort order: newest, popular, price-low, price-high
    #[arg(long, default_value = "newest")]
    pub sort: String,

    /// Case-insensitive text matched against title and description
    #[arg(long, short = 'q', default_value = "")]
    pub search: String,

    /// Only show these categories (repeatable, exact match)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Price range as MIN-MAX (e.g. 0-5000, 800-, -1500)
    #[arg(
        long,
        allow_hyphen_values = true,
        value_parser = parse::price_range,
        conflicts_with_all = ["min_price", "max_price"]
    )]
    pub price: Option<PriceRange>,

    /// Lowest price to include
    #[arg(long, value_parser = parse::price_bound)]
    pub min_price: Option<f64>,

    /// Highest price to include
    #[arg(long, value_parser = parse::price_bound)]
    pub max_price: Option<f64>,

    /// Only show this brand (exact match)
    #[arg(long)]
    pub brand: Option<String>,

    /// Lowest rating to include, 0-5
    #[arg(long, value_parser = parse::rating)]
    pub min_rating: Option<f64>,
}

impl ProductsArgs {
    /// Build the engine query. Fails when `--min-price` is above `--max-price`.
    pub fn to_query(&self) -> Result<Query, String> {
        let price_range = match (self.price, self.min_price, self.max_price) {
            (Some(range), _, _) => Some(range),
            (None, None, None) => None,
            (None, min, max) => Some(parse::checked_range(
                min.unwrap_or(0.0),
                max.unwrap_or(f64::INFINITY),
            )?),
        };

        Ok(Query {
            page: self.page,
            sort: SortKey::parse(&self.sort),
            search: self.search.clone(),
            filters: FilterSet {
                categories: self.categories.iter().cloned().collect(),
                price_range,
                brand: self.brand.clone().filter(|b| !b.is_empty()),
                min_rating: self.min_rating,
            },
        })
    }
}
