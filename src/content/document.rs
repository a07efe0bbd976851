//! Document model

use chrono::NaiveDate;

/// A blog document (post or tutorial)
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Routing key derived from the source path, e.g. `/tdd-react/`
    pub slug: String,

    /// Title from front-matter
    pub title: Option<String>,

    /// Publication date, used for ordering
    pub date: Option<NaiveDate>,

    /// Short description from front-matter
    pub description: Option<String>,

    /// Plain-text summary
    pub excerpt: String,

    /// Rendered HTML body
    pub body: String,

    /// Source file path relative to the blog directory
    pub source: String,

    /// Drafts are skipped unless `render_drafts` is set
    pub draft: bool,
}

impl Document {
    /// Create an empty document with the given slug
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            date: None,
            description: None,
            excerpt: String::new(),
            body: String::new(),
            source: String::new(),
            draft: false,
        }
    }

    /// Set the publication date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title to show in links, falling back to the slug
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.slug)
    }
}
