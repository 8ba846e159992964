use crate::catalog::CatalogSource;
use crate::error::StoreError;
use crate::query::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: CatalogSource,
    pub page_size: usize,
    pub currency: String,
    pub no_cache: bool,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: ConfigDefaults,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigDefaults {
    catalog: Option<String>,
    page_size: Option<usize>,
    currency: Option<String>,
}

/// Values read from `STOREFRONT_*` environment variables.
#[derive(Debug, Default)]
struct EnvOverrides {
    catalog: Option<String>,
    page_size: Option<String>,
    currency: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            catalog: std::env::var("STOREFRONT_CATALOG").ok(),
            page_size: std::env::var("STOREFRONT_PAGE_SIZE").ok(),
            currency: std::env::var("STOREFRONT_CURRENCY").ok(),
        }
    }
}

impl AppConfig {
    pub fn load(
        catalog: Option<String>,
        page_size: Option<usize>,
        no_cache: bool,
    ) -> Result<Self, StoreError> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("storefront-cli");
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("storefront-cli");

        let file_config = load_config_file(&config_dir);
        let mut config = Self::resolve(
            catalog,
            page_size,
            EnvOverrides::from_env(),
            file_config,
            cache_dir,
        )?;
        config.no_cache = no_cache;
        Ok(config)
    }

    // Priority: CLI flags → env vars → config file → defaults
    fn resolve(
        catalog: Option<String>,
        page_size: Option<usize>,
        env: EnvOverrides,
        file_config: ConfigFile,
        cache_dir: PathBuf,
    ) -> Result<Self, StoreError> {
        let catalog = catalog
            .or(env.catalog)
            .or(file_config.defaults.catalog)
            .map(|s| CatalogSource::parse(&s))
            .unwrap_or(CatalogSource::Builtin);

        let env_page_size = env
            .page_size
            .map(|s| {
                s.trim().parse::<usize>().map_err(|_| {
                    StoreError::Config(format!("STOREFRONT_PAGE_SIZE is not a number: '{}'", s))
                })
            })
            .transpose()?;

        let page_size = page_size
            .or(env_page_size)
            .or(file_config.defaults.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let currency = env
            .currency
            .or(file_config.defaults.currency)
            .unwrap_or_else(|| "USD".to_string())
            .to_uppercase();

        Self::validate_page_size(page_size)?;

        Ok(AppConfig {
            catalog,
            page_size,
            currency,
            no_cache: false,
            cache_dir,
        })
    }

    pub fn validate_page_size(page_size: usize) -> Result<(), StoreError> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(StoreError::Config(format!(
                "Page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        Ok(())
    }
}

fn load_config_file(config_dir: &Path) -> ConfigFile {
    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
                ConfigFile::default()
            }),
            Err(_) => ConfigFile::default(),
        }
    } else {
        ConfigFile::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(
        catalog: Option<&str>,
        page_size: Option<usize>,
        env: EnvOverrides,
        file: ConfigFile,
    ) -> Result<AppConfig, StoreError> {
        AppConfig::resolve(
            catalog.map(String::from),
            page_size,
            env,
            file,
            PathBuf::from("/tmp/storefront-test"),
        )
    }

    #[test]
    fn test_defaults() {
        let config = resolve(None, None, EnvOverrides::default(), ConfigFile::default()).unwrap();
        assert_eq!(config.catalog, CatalogSource::Builtin);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.currency, "USD");
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            [defaults]
            catalog = "file.json"
            page_size = 12
            currency = "eur"
            "#,
        )
        .unwrap();

        let env = EnvOverrides {
            catalog: Some("env.json".to_string()),
            page_size: Some("9".to_string()),
            currency: None,
        };
        let config = resolve(Some("flag.json"), None, env, file).unwrap();
        assert_eq!(config.catalog, CatalogSource::File(PathBuf::from("flag.json")));
        assert_eq!(config.page_size, 9);
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn test_file_used_when_nothing_else_set() {
        let file: ConfigFile = toml::from_str("[defaults]\npage_size = 12\n").unwrap();
        let config = resolve(None, None, EnvOverrides::default(), file).unwrap();
        assert_eq!(config.page_size, 12);
    }

    #[test]
    fn test_rejects_bad_page_sizes() {
        assert!(resolve(None, Some(0), EnvOverrides::default(), ConfigFile::default()).is_err());
        assert!(resolve(None, Some(101), EnvOverrides::default(), ConfigFile::default()).is_err());

        let env = EnvOverrides {
            page_size: Some("six".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve(None, None, env, ConfigFile::default()),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_config_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "defaults = [[[").unwrap();
        let file = load_config_file(dir.path());
        assert!(file.defaults.page_size.is_none());

        std::fs::write(
            dir.path().join("config.toml"),
            "[defaults]\ncatalog = \"https://shop.example.com/c.json\"\n",
        )
        .unwrap();
        let file = load_config_file(dir.path());
        assert_eq!(
            file.defaults.catalog.as_deref(),
            Some("https://shop.example.com/c.json")
        );
    }
}
