//! Generator module - runs the build pipeline and writes the site

mod sitemap;
mod stages;

use anyhow::{Context as _, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

use crate::config::PageConfig;
use crate::content::loader::is_markdown_file;
use crate::content::{html_escape, Collection, ContentStore, Document, Filter, SortOrder};
use crate::listing::{self, Selection};
use crate::templates::{
    meta_description, ArticleData, NavPost, PostData, SiteData, TemplateRenderer,
};
use crate::Folio;

pub use sitemap::{build_sitemap, Route};
pub use stages::{apply_content_stages, Analytics};

/// Summary of a finished build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Every route written, listing pages first
    pub routes: Vec<Route>,
    /// Sitemap file, when the sitemap stage is configured
    pub sitemap: Option<PathBuf>,
}

/// Static site generator using the embedded templates
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
    analytics: Option<Analytics>,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let analytics = folio.config.analytics().and_then(Analytics::from_config);

        Ok(Self {
            folio: folio.clone(),
            renderer,
            analytics,
        })
    }

    /// Generate the entire site from a loaded collection
    pub fn generate(&self, collection: Collection) -> Result<BuildReport> {
        fs::create_dir_all(&self.folio.public_dir)?;

        let collection = apply_content_stages(&self.folio.config.stages, collection);
        let site_data = SiteData::from_config(&self.folio.config);

        let mut report = BuildReport::default();

        self.generate_listing_pages(&collection, &site_data, &mut report)?;
        self.generate_document_pages(&collection, &site_data, &mut report)?;

        self.copy_dir(&self.folio.assets_dir, &self.folio.public_dir.join("assets"))?;
        self.copy_linked_files()?;

        if let Some(sitemap) = self.folio.config.sitemap() {
            report.sitemap = Some(build_sitemap(
                &self.folio.config,
                sitemap,
                &self.folio.public_dir,
                &report.routes,
            )?);
        }

        Ok(report)
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("root", &self.folio.config.root);
        context.insert(
            "current_year",
            &chrono::Local::now().format("%Y").to_string(),
        );
        context
    }

    /// Generate one page per configured listing
    fn generate_listing_pages(
        &self,
        collection: &Collection,
        site_data: &SiteData,
        report: &mut BuildReport,
    ) -> Result<()> {
        for page in &self.folio.config.pages {
            let selection = listing::select(collection.documents(), page.featured.as_deref());

            if let (Some(slug), None) = (&page.featured, selection.featured) {
                tracing::warn!(
                    "Featured document {} for page {} not found, listing every document",
                    slug,
                    page.path
                );
            }

            let html = self.render_listing(page, &selection, site_data)?;
            self.write_route(&page.path, &html)?;

            report.routes.push(Route {
                path: page.path.clone(),
                lastmod: newest_date(&selection),
            });
        }

        Ok(())
    }

    /// Render a listing page from a selection
    fn render_listing(
        &self,
        page: &PageConfig,
        selection: &Selection<'_>,
        site_data: &SiteData,
    ) -> Result<String> {
        let config = &self.folio.config;
        let featured = selection.featured.map(|doc| ArticleData::new(config, doc));
        let posts: Vec<PostData> = selection
            .remainder
            .iter()
            .map(|doc| PostData::new(config, doc))
            .collect();

        let mut context = self.create_base_context(site_data);
        context.insert("is_home", &(page.path == "/"));
        context.insert(
            "page_title",
            &featured.as_ref().map(|f| f.title.clone()).unwrap_or_default(),
        );
        context.insert(
            "page_description",
            &meta_description(
                selection
                    .featured
                    .and_then(|doc| doc.description.as_deref())
                    .unwrap_or(&config.description),
            ),
        );
        context.insert("heading", &page.heading);
        context.insert("featured", &featured);
        context.insert("posts", &posts);

        self.renderer.render("listing.html", &context)
    }

    /// Generate individual document pages
    fn generate_document_pages(
        &self,
        collection: &Collection,
        site_data: &SiteData,
        report: &mut BuildReport,
    ) -> Result<()> {
        let config = &self.folio.config;
        let listing_paths: HashSet<&str> =
            config.pages.iter().map(|p| p.path.as_str()).collect();
        let posts: Vec<&Document> = collection
            .find(&Filter::All, SortOrder::Desc)
            .into_iter()
            .filter(|doc| {
                let shadowed = listing_paths.contains(doc.slug.as_str());
                if shadowed {
                    tracing::warn!(
                        "Document {} shares its route with a listing page, skipping",
                        doc.source
                    );
                }
                !shadowed
            })
            .collect();

        for (i, doc) in posts.iter().enumerate() {
            // Older neighbour first, newer second
            let prev_post = posts.get(i + 1).map(|p| NavPost::new(config, p));
            let next_post = i
                .checked_sub(1)
                .and_then(|j| posts.get(j))
                .map(|p| NavPost::new(config, p));

            let mut context = self.create_base_context(site_data);
            context.insert("is_home", &false);
            context.insert("page_title", &html_title(doc));
            context.insert(
                "page_description",
                &meta_description(doc.description.as_deref().unwrap_or(&doc.excerpt)),
            );
            context.insert("post", &ArticleData::new(config, doc));
            context.insert("prev_post", &prev_post);
            context.insert("next_post", &next_post);

            let html = self.renderer.render("article.html", &context)?;
            self.write_route(&doc.slug, &html)?;

            report.routes.push(Route {
                path: doc.slug.clone(),
                lastmod: doc.date,
            });
        }

        Ok(())
    }

    /// Write a rendered page to `<route>/index.html`
    fn write_route(&self, route: &str, html: &str) -> Result<()> {
        let html = match &self.analytics {
            Some(analytics) => analytics.inject(html),
            None => html.to_string(),
        };

        let output_path = self
            .folio
            .public_dir
            .join(route.trim_start_matches('/'))
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(())
    }

    /// Copy a directory tree verbatim
    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(from)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let dest = to.join(path.strip_prefix(from)?);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)
                    .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
            }
        }

        Ok(())
    }

    /// Copy non-markdown files from the blog directory next to their posts
    fn copy_linked_files(&self) -> Result<()> {
        let source_dir = &self.folio.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && !is_markdown_file(path) {
                let dest = self.folio.public_dir.join(path.strip_prefix(source_dir)?);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Page title for a document, escaped for HTML
fn html_title(doc: &Document) -> String {
    html_escape(doc.display_title())
}

/// Date of the most recent document on a listing page
fn newest_date(selection: &Selection<'_>) -> Option<chrono::NaiveDate> {
    selection
        .featured
        .iter()
        .chain(selection.remainder.iter())
        .filter_map(|doc| doc.date)
        .max()
}
