//! Content loader - builds the collection from the blog directory

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

use super::{derive_excerpt, Collection, Document, FrontMatter, MarkdownRenderer, EXCERPT_LENGTH};
use crate::helpers::url_for;
use crate::Folio;

lazy_static! {
    static ref LINK_ATTR: Regex = Regex::new(r#"\b(src|href)="([^"]*)""#).unwrap();
}

/// Loads documents from the source directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        let renderer = MarkdownRenderer::with_options(&folio.config.highlight);
        Self { folio, renderer }
    }

    /// Load every document under the source directory.
    ///
    /// Files are visited in file-name order so the collection order is
    /// reproducible across runs.
    pub fn load(&self) -> Result<Collection> {
        let source_dir = &self.folio.source_dir;
        if !source_dir.exists() {
            tracing::warn!("Source directory {:?} does not exist", source_dir);
            return Ok(Collection::default());
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_document(path) {
                Ok(doc) if doc.draft && !self.folio.config.render_drafts => {
                    tracing::debug!("Skipping draft {}", doc.source);
                }
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!("Failed to load document {:?}: {:#}", path, e);
                }
            }
        }

        Ok(Collection::new(documents)?)
    }

    /// Load a single document from a file
    fn load_document(&self, path: &Path) -> Result<Document> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let relative = path.strip_prefix(&self.folio.source_dir).unwrap_or(path);
        let slug = slug_for(relative);

        let date = fm.parse_date();
        if date.is_none() {
            if let Some(raw) = &fm.date {
                tracing::warn!("Unrecognized date {:?} in {:?}", raw, path);
            }
        }

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let body_html = self.renderer.render(&full_md)?;
        // Bodies are also embedded on listing pages, so relative links must
        // point at the document's own route
        let body_html = absolutize_links(&body_html, &url_for(&self.folio.config, &slug));
        let excerpt = match excerpt_md {
            Some(md) => derive_excerpt(&self.renderer.render(&md)?, usize::MAX),
            None => derive_excerpt(&body_html, EXCERPT_LENGTH),
        };

        let mut doc = Document::new(slug);
        doc.title = fm.title;
        doc.date = date;
        doc.description = fm.description;
        doc.excerpt = excerpt;
        doc.body = body_html;
        doc.source = relative.to_string_lossy().replace('\\', "/");
        doc.draft = fm.draft;

        Ok(doc)
    }
}

/// Derive a slug from a path relative to the source directory.
///
/// The extension is dropped, as is a trailing `index` component:
/// `tdd-react/index.md` becomes `/tdd-react/` and `hello.md` becomes
/// `/hello/`.
pub fn slug_for(relative: &Path) -> String {
    let stem = relative.with_extension("");
    let mut parts: Vec<String> = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    if parts.last().map(|p| p == "index").unwrap_or(false) {
        parts.pop();
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", parts.join("/"))
    }
}

/// Resolve relative `src`/`href` values against `base`
fn absolutize_links(html: &str, base: &str) -> String {
    LINK_ATTR
        .replace_all(html, |caps: &Captures| {
            let value = &caps[2];
            if value.is_empty()
                || value.starts_with('/')
                || value.starts_with('#')
                || value.contains(':')
            {
                return caps[0].to_string();
            }
            let relative = value.trim_start_matches("./");
            format!(r#"{}="{}{}""#, &caps[1], base, relative)
        })
        .into_owned()
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn write(base: &Path, relative: &str, content: &str) {
        let path = base.join("content/blog").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_slug_for() {
        assert_eq!(slug_for(&PathBuf::from("tdd-react/index.md")), "/tdd-react/");
        assert_eq!(slug_for(&PathBuf::from("hello.md")), "/hello/");
        assert_eq!(slug_for(&PathBuf::from("2020/intro.markdown")), "/2020/intro/");
        assert_eq!(slug_for(&PathBuf::from("index.md")), "/");
    }

    #[test]
    fn test_absolutize_links() {
        let html = r##"<img src="./diagram.png"><a href="notes.pdf">n</a><a href="https://x.io">x</a><a href="/abs/">a</a><a href="#top">t</a>"##;
        assert_eq!(
            absolutize_links(html, "/tdd-react/"),
            r##"<img src="/tdd-react/diagram.png"><a href="/tdd-react/notes.pdf">n</a><a href="https://x.io">x</a><a href="/abs/">a</a><a href="#top">t</a>"##
        );
    }

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file(Path::new("a.md")));
        assert!(is_markdown_file(Path::new("a.markdown")));
        assert!(!is_markdown_file(Path::new("a.png")));
        assert!(!is_markdown_file(Path::new("README")));
    }

    #[test]
    fn test_load_collection() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "tdd-react/index.md",
            "---\ntitle: TDD en React\ndate: 2020-01-01\ndescription: Guía\n---\nIntro.\n<!-- more -->\nResto.",
        );
        write(dir.path(), "x.md", "---\ndate: 2021-01-01\n---\n# X\n\nCuerpo.");
        write(dir.path(), "tdd-react/diagram.png", "not markdown");

        let folio = Folio::new(dir.path()).unwrap();
        let collection = ContentLoader::new(&folio).load().unwrap();
        assert_eq!(collection.len(), 2);

        let docs = collection.documents();
        assert_eq!(docs[0].slug, "/tdd-react/");
        assert_eq!(docs[0].title.as_deref(), Some("TDD en React"));
        assert_eq!(docs[0].description.as_deref(), Some("Guía"));
        assert_eq!(docs[0].date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(docs[0].excerpt, "Intro.");
        assert!(docs[0].body.contains("Resto."));
        assert_eq!(docs[0].source, "tdd-react/index.md");

        assert_eq!(docs[1].slug, "/x/");
        assert_eq!(docs[1].title, None);
        assert_eq!(docs[1].display_title(), "/x/");
        assert_eq!(docs[1].excerpt, "X Cuerpo.");
    }

    #[test]
    fn test_drafts_skipped_unless_enabled() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "wip.md", "---\ntitle: WIP\ndraft: true\n---\nSoon.");

        let folio = Folio::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&folio).load().unwrap().is_empty());

        let mut folio = folio;
        folio.config.render_drafts = true;
        assert_eq!(ContentLoader::new(&folio).load().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_slug_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "hello.md", "Hello");
        write(dir.path(), "hello/index.md", "Hello again");

        let folio = Folio::new(dir.path()).unwrap();
        let err = ContentLoader::new(&folio).load().unwrap_err();
        assert!(err.to_string().contains("/hello/"));
    }

    #[test]
    fn test_missing_source_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(ContentLoader::new(&folio).load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_frontmatter_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.md", "{\"title\": \"Sin cerrar\",}\nCuerpo.");
        write(dir.path(), "braces.md", "{{< youtube id >}} Video.");

        let folio = Folio::new(dir.path()).unwrap();
        let collection = ContentLoader::new(&folio).load().unwrap();
        let slugs: Vec<&str> = collection.documents().iter().map(|d| d.slug.as_str()).collect();
        assert_eq!(slugs, vec!["/braces/", "/broken/"]);

        let broken = &collection.documents()[1];
        assert_eq!(broken.title, None);
        assert!(broken.body.contains("Cuerpo."));
        assert!(collection.documents()[0].body.contains("Video."));
    }
}
