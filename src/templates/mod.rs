//! Built-in templates using the Tera template engine
//!
//! The listing and article templates are embedded in the binary. Text
//! fields are escaped when the view data is built, so autoescaping is off
//! and URLs stay readable.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{html_escape, Document};
use crate::helpers::{format_date, url_for};

/// Template renderer with the embedded default theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("listing.html", include_str!("default/listing.html")),
            ("article.html", include_str!("default/article.html")),
            (
                "partials/bio.html",
                include_str!("default/partials/bio.html"),
            ),
            (
                "partials/post_list.html",
                include_str!("default/partials/post_list.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Longest meta description, in characters
pub const META_DESCRIPTION_LENGTH: usize = 160;

/// Meta description text: truncated on characters, then escaped
pub fn meta_description(text: &str) -> String {
    html_escape(&truncate_chars(text.trim(), META_DESCRIPTION_LENGTH))
}

/// Truncate to `length` characters, appending `…` when anything was cut
fn truncate_chars(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let truncated: String = s.chars().take(length).collect();
    format!("{}…", truncated.trim_end())
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub author_summary: String,
    pub language: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: html_escape(&config.title),
            description: html_escape(&config.description),
            author: html_escape(&config.author.name),
            author_summary: html_escape(&config.author.summary),
            language: config.language.clone(),
        }
    }
}

/// A document as a list entry
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub excerpt: String,
}

impl PostData {
    pub fn new(config: &SiteConfig, doc: &Document) -> Self {
        Self {
            slug: doc.slug.clone(),
            url: url_for(config, &doc.slug),
            title: html_escape(doc.display_title()),
            date: doc.date.map(|d| format_date(&d, &config.date_format)),
            description: doc.description.as_deref().map(html_escape),
            excerpt: html_escape(&doc.excerpt),
        }
    }
}

/// A document rendered in full
#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub body: String,
}

impl ArticleData {
    pub fn new(config: &SiteConfig, doc: &Document) -> Self {
        Self {
            slug: doc.slug.clone(),
            url: url_for(config, &doc.slug),
            title: html_escape(doc.display_title()),
            date: doc.date.map(|d| format_date(&d, &config.date_format)),
            description: doc.description.as_deref().map(html_escape),
            body: doc.body.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

impl NavPost {
    pub fn new(config: &SiteConfig, doc: &Document) -> Self {
        Self {
            title: html_escape(doc.display_title()),
            url: url_for(config, &doc.slug),
        }
    }
}
