//! Sitemap generation.
//!
//! Lists every rendered route that is not excluded by the sitemap stage:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/tdd-react/</loc>
//!     <lastmod>2020-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use glob::Pattern;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{SiteConfig, SitemapConfig};
use crate::helpers::{date_xml, full_url_for};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A rendered route
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Route path, e.g. `/tdd-react/`
    pub path: String,
    pub lastmod: Option<NaiveDate>,
}

/// Build and write the sitemap, returning the file written
pub fn build_sitemap(
    config: &SiteConfig,
    sitemap: &SitemapConfig,
    public_dir: &Path,
    routes: &[Route],
) -> Result<PathBuf> {
    let xml = Sitemap::build(config, sitemap, routes).into_xml();

    let output = public_dir.join(sitemap.output.trim_start_matches('/'));
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, xml)
        .with_context(|| format!("Failed to write sitemap to {}", output.display()))?;

    tracing::info!("Generated {}", sitemap.output);
    Ok(output)
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

impl Sitemap {
    fn build(config: &SiteConfig, sitemap: &SitemapConfig, routes: &[Route]) -> Self {
        let exclusions = Exclusions::new(&sitemap.exclude);

        let urls = routes
            .iter()
            .filter(|route| !exclusions.matches(&route.path))
            .map(|route| UrlEntry {
                loc: full_url_for(config, &route.path),
                lastmod: route.lastmod.as_ref().map(date_xml),
            })
            .collect();

        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod);
                xml.push_str("</lastmod>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Route exclusion patterns
struct Exclusions {
    patterns: Vec<Pattern>,
    literals: Vec<String>,
}

impl Exclusions {
    fn new(raw: &[String]) -> Self {
        let mut patterns = Vec::new();
        let mut literals = Vec::new();
        for entry in raw {
            match Pattern::new(entry) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => {
                    tracing::warn!("Invalid sitemap exclusion {:?} ({}), matching literally", entry, e);
                    literals.push(entry.clone());
                }
            }
        }
        Self { patterns, literals }
    }

    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path)) || self.literals.iter().any(|l| l == path)
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
