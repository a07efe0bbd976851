//! Content module - documents, front-matter, rendering and the content store

mod document;
mod frontmatter;
pub mod loader;
mod markdown;
mod store;

use thiserror::Error;

pub use document::Document;
pub use frontmatter::FrontMatter;
pub use markdown::{derive_excerpt, html_escape, strip_html, MarkdownRenderer, EXCERPT_LENGTH};
pub use store::{Collection, ContentStore, Filter, SortOrder};

/// Errors raised while building a collection
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Slug {slug} is produced by both {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}
