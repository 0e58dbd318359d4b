//! CLI configuration

use std::path::PathBuf;

use clap::Args;
use parkcart::{
    cart::{CART_STORAGE_KEY, CartRepository},
    catalog::{Catalog, CatalogError},
    storage::FileStorage,
};
use tracing::debug;

/// Cart persistence settings.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "PARKCART_STORAGE_DIR", default_value = ".parkcart", global = true)]
    pub(crate) storage_dir: PathBuf,

    /// Storage key the cart is saved under
    #[arg(long, env = "PARKCART_CART_KEY", default_value = CART_STORAGE_KEY, global = true)]
    pub(crate) cart_key: String,
}

impl StorageConfig {
    /// Repository over the configured storage directory.
    pub(crate) fn repository(&self) -> CartRepository<FileStorage> {
        CartRepository::with_key(FileStorage::new(&self.storage_dir), &self.cart_key)
    }
}

/// Catalogue settings.
#[derive(Debug, Args)]
pub(crate) struct CatalogConfig {
    /// Path of the park catalogue YAML file
    #[arg(
        long = "catalog",
        env = "PARKCART_CATALOG",
        default_value = "fixtures/parks.yml",
        global = true
    )]
    pub(crate) catalog_path: PathBuf,
}

impl CatalogConfig {
    /// Read and validate the catalogue.
    pub(crate) fn load(&self) -> Result<Catalog, CatalogError> {
        let catalog = Catalog::from_path(&self.catalog_path)?;

        debug!(
            path = %self.catalog_path.display(),
            parks = catalog.parks().len(),
            "loaded catalogue"
        );

        Ok(catalog)
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub(crate) log_format: LogFormat,
}
