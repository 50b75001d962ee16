//! Configuration
//!
//! Settings come from CLI flags with environment fallbacks; a `.env` file in
//! the working directory is loaded first when present.

use std::path::PathBuf;

use clap::Args;

use crate::{
    catalog::{Catalog, CatalogError},
    deeplink::{DEFAULT_BASE_URL, DEFAULT_BUSINESS_NUMBER, DeepLinkBuilder},
    storage::FileStorage,
};

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Storefront settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "AEVRA_DATA_DIR", default_value = ".aevra")]
    pub data_dir: PathBuf,

    /// YAML catalog file; the built-in catalog is used when omitted
    #[arg(long, env = "AEVRA_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Business number orders are sent to
    #[arg(long, env = "AEVRA_BUSINESS_NUMBER", default_value = DEFAULT_BUSINESS_NUMBER)]
    pub business_number: String,

    /// Base URL of the messaging service
    #[arg(long, env = "AEVRA_MESSAGING_URL", default_value = DEFAULT_BASE_URL)]
    pub messaging_url: String,
}

impl StoreConfig {
    /// Load the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a catalog file is configured but cannot be loaded.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::from_path(path),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Storage medium for the cart.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }

    /// Deep link builder for the configured business.
    pub fn links(&self) -> DeepLinkBuilder {
        DeepLinkBuilder::with_base_url(&self.messaging_url, &self.business_number)
    }
}
