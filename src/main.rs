mod cache;
mod catalog;
mod cli;
mod config;
mod error;
mod model;
mod output;
mod parse;
mod query;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ProductsArgs};
use config::AppConfig;

use crate::cache::Cache;
use crate::catalog::Catalog;

const RELATED_LIMIT: usize = 3;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "storefront_cli=debug"
    } else {
        "storefront_cli=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::load(cli.catalog, cli.page_size, cli.no_cache)?;

    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted.");
        std::process::exit(130);
    })
    .context("Failed to set Ctrl+C handler")?;

    let cache = Cache::new(config.cache_dir.clone(), config.no_cache);
    let catalog = Catalog::load(&config.catalog, &cache)
        .await
        .with_context(|| format!("Failed to load catalog from {}", config.catalog))?;
    tracing::debug!("Catalog holds {} products", catalog.products.len());

    match cli.command {
        Commands::Products(args) => cmd_products(&config, &catalog, &args, cli.json)?,
        Commands::Product { id_or_url } => cmd_product(&config, &catalog, id_or_url, cli.json)?,
        Commands::Categories => cmd_categories(&catalog, cli.json)?,
        Commands::Featured => cmd_featured(&config, &catalog, cli.json)?,
    }

    Ok(())
}

fn cmd_products(
    config: &AppConfig,
    catalog: &Catalog,
    args: &ProductsArgs,
    json: bool,
) -> Result<()> {
    let q = args.to_query().map_err(anyhow::Error::msg)?;
    let result = query::query(&catalog.products, &q, config.page_size);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", output::format_result_page(&result, &q, &config.currency));
    }
    Ok(())
}

fn cmd_product(config: &AppConfig, catalog: &Catalog, id: u64, json: bool) -> Result<()> {
    let view = catalog.view(id, RELATED_LIMIT)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", output::format_product_view(&view, &config.currency));
    }
    Ok(())
}

fn cmd_categories(catalog: &Catalog, json: bool) -> Result<()> {
    let index = catalog.category_index();

    if json {
        println!("{}", serde_json::to_string_pretty(&index)?);
    } else {
        print!("{}", output::format_categories(&index));
    }
    Ok(())
}

fn cmd_featured(config: &AppConfig, catalog: &Catalog, json: bool) -> Result<()> {
    let featured = catalog.featured();

    if json {
        println!("{}", serde_json::to_string_pretty(&featured)?);
    } else {
        print!("{}", output::format_featured(&featured, &config.currency));
    }
    Ok(())
}
