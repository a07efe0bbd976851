//! List site content

use anyhow::{bail, Result};
use std::fmt::Write;

use crate::content::loader::ContentLoader;
use crate::content::{ContentStore, Document, Filter, SortOrder};
use crate::listing;
use crate::Folio;

/// Print site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    print!("{}", render(folio, content_type)?);
    Ok(())
}

/// Listing text for a content type
pub fn render(folio: &Folio, content_type: &str) -> Result<String> {
    let collection = ContentLoader::new(folio).load()?;
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = collection.find(&Filter::All, SortOrder::Desc);
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(out, "  {}", describe(post))?;
            }
        }
        "page" | "pages" => {
            writeln!(out, "Pages ({}):", folio.config.pages.len())?;
            for page in &folio.config.pages {
                let selection =
                    listing::select(collection.documents(), page.featured.as_deref());
                writeln!(out, "  {}", page.path)?;
                match (&page.featured, selection.featured) {
                    (Some(_), Some(doc)) => writeln!(out, "    featured: {}", describe(doc))?,
                    (Some(slug), None) => writeln!(out, "    featured: {} (not found)", slug)?,
                    (None, _) => {}
                }
                for doc in &selection.remainder {
                    writeln!(out, "    - {}", describe(doc))?;
                }
            }
        }
        _ => {
            bail!("Unknown type: {}. Available: post, page", content_type);
        }
    }

    Ok(out)
}

fn describe(doc: &Document) -> String {
    let date = doc
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    format!("{} - {} [{}]", date, doc.display_title(), doc.slug)
}
