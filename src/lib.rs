//! folio: a small static blog generator
//!
//! Documents are loaded from a blog directory, split by [`listing::select`]
//! into an optional featured article and a newest-first list, and rendered
//! through embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod listing;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Config file looked up in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// TOML alternative, used when no `_config.yml` exists
pub const CONFIG_FILE_TOML: &str = "_config.toml";

/// Config file present in `base_dir`, YAML first
pub fn find_config(base_dir: &Path) -> Option<PathBuf> {
    [CONFIG_FILE, CONFIG_FILE_TOML]
        .iter()
        .map(|name| base_dir.join(name))
        .find(|path| path.exists())
}

/// The main application
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Blog documents directory
    pub source_dir: PathBuf,
    /// Static assets directory
    pub assets_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = match find_config(&base_dir) {
            Some(config_path) => config::SiteConfig::load(&config_path)?,
            None => {
                tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
                config::SiteConfig::default()
            }
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let assets_dir = base_dir.join(&config.assets_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            assets_dir,
            public_dir,
        }
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<generator::BuildReport> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post, in a directory named `name` or after the title
    pub fn new_post(&self, title: &str, name: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, name)
    }
}
