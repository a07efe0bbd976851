//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::ConfigError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: AuthorConfig,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub assets_dir: String,
    pub public_dir: String,

    // Writing
    pub render_drafts: bool,
    pub date_format: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Listing pages, each optionally built around a featured article
    pub pages: Vec<PageConfig>,

    // Build stages, applied in the order listed
    pub stages: Vec<StageConfig>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: String::new(),
            author: AuthorConfig::default(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "content/blog".to_string(),
            assets_dir: "content/assets".to_string(),
            public_dir: "public".to_string(),

            render_drafts: false,
            date_format: "MMMM DD, YYYY".to_string(),
            highlight: HighlightConfig::default(),

            pages: vec![PageConfig::default()],
            stages: Vec::new(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file.
    ///
    /// `.toml` files are read as TOML, everything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;

        let config: SiteConfig = if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            toml::from_str(&content).with_context(|| format!("Invalid TOML in {:?}", path))?
        } else {
            serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML in {:?}", path))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the semantic rules serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for page in &self.pages {
            if !is_route(&page.path) {
                return Err(ConfigError::InvalidRoute {
                    field: "pages.path",
                    value: page.path.clone(),
                });
            }
            if let Some(featured) = &page.featured {
                if !is_route(featured) {
                    return Err(ConfigError::InvalidRoute {
                        field: "pages.featured",
                        value: featured.clone(),
                    });
                }
            }
            if !seen.insert(page.path.as_str()) {
                return Err(ConfigError::DuplicatePage(page.path.clone()));
            }
        }

        for stage in &self.stages {
            if let StageConfig::Images(images) = stage {
                if images.max_width == 0 {
                    return Err(ConfigError::InvalidImageWidth);
                }
            }
        }

        Ok(())
    }

    /// Sitemap stage, if configured
    pub fn sitemap(&self) -> Option<&SitemapConfig> {
        self.stages.iter().find_map(|s| match s {
            StageConfig::Sitemap(c) => Some(c),
            _ => None,
        })
    }

    /// Analytics stage, if configured
    pub fn analytics(&self) -> Option<&AnalyticsConfig> {
        self.stages.iter().find_map(|s| match s {
            StageConfig::Analytics(c) => Some(c),
            _ => None,
        })
    }
}

/// Routes and slugs are always wrapped in slashes
fn is_route(value: &str) -> bool {
    value.starts_with('/') && value.ends_with('/')
}

/// Site author, shown in the bio block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub summary: String,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            summary: String::new(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// A listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Output route, e.g. `/` or `/posts/`
    pub path: String,
    /// Heading above the post list
    pub heading: String,
    /// Slug of the document embedded as the main article
    pub featured: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            heading: "Posts".to_string(),
            featured: None,
        }
    }
}

/// One build stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StageConfig {
    Images(ImagesConfig),
    Iframes(IframesConfig),
    Analytics(AnalyticsConfig),
    Sitemap(SitemapConfig),
}

/// Cap rendered image width
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImagesConfig {
    pub max_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { max_width: 630 }
    }
}

/// Wrap embedded iframes in a responsive container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IframesConfig {
    pub wrapper_style: String,
}

impl Default for IframesConfig {
    fn default() -> Self {
        Self {
            wrapper_style: "margin-bottom: 1.0725rem".to_string(),
        }
    }
}

/// Analytics snippet injection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Environment variable holding the tracking ID
    pub tracking_id_env: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            tracking_id_env: "GOOGLE_ANALYTICS_ID".to_string(),
        }
    }
}

/// Sitemap output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SitemapConfig {
    /// Output path relative to the public directory
    pub output: String,
    /// Glob patterns of routes to leave out
    pub exclude: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            output: "/sitemap.xml".to_string(),
            exclude: Vec::new(),
        }
    }
}
