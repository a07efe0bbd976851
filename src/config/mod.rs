//! Configuration module

mod site;

use thiserror::Error;

pub use site::AnalyticsConfig;
pub use site::AuthorConfig;
pub use site::HighlightConfig;
pub use site::IframesConfig;
pub use site::ImagesConfig;
pub use site::PageConfig;
pub use site::SiteConfig;
pub use site::SitemapConfig;
pub use site::StageConfig;

/// Configuration that parses but makes no sense
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must start and end with '/': {value:?}")]
    InvalidRoute { field: &'static str, value: String },

    #[error("Page path configured twice: {0}")]
    DuplicatePage(String),

    #[error("Image max_width must be greater than zero")]
    InvalidImageWidth,
}
