//! Content store - query interface over a document collection

use std::cmp::Ordering;
use std::collections::HashMap;

use super::{ContentError, Document};

/// Document filter. Predicates are equality on the slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    SlugEq(String),
    SlugNe(String),
}

impl Filter {
    /// Whether a document passes the filter
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::SlugEq(slug) => doc.slug == *slug,
            Filter::SlugNe(slug) => doc.slug != *slug,
        }
    }
}

/// Order by publication date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Compare two documents by date.
    ///
    /// A missing date counts as the earliest possible date: undated
    /// documents come last in `Desc` and first in `Asc`.
    pub fn compare(self, a: &Document, b: &Document) -> Ordering {
        match self {
            SortOrder::Asc => a.date.cmp(&b.date),
            SortOrder::Desc => b.date.cmp(&a.date),
        }
    }

    /// Stable sort, so equal dates keep their input order
    pub fn sort(self, docs: &mut [&Document]) {
        docs.sort_by(|a, b| self.compare(a, b));
    }
}

/// Query interface the listing and rendering layers consume
pub trait ContentStore {
    /// Every document, in load order
    fn documents(&self) -> &[Document];

    /// Documents passing `filter`, sorted by date
    fn find(&self, filter: &Filter, order: SortOrder) -> Vec<&Document> {
        let mut found: Vec<&Document> = self
            .documents()
            .iter()
            .filter(|doc| filter.matches(doc))
            .collect();
        order.sort(&mut found);
        found
    }

    /// First document passing `filter`; `None` is a normal outcome
    fn find_one(&self, filter: &Filter) -> Option<&Document> {
        self.documents().iter().find(|doc| filter.matches(doc))
    }
}

/// In-memory collection with unique slugs
#[derive(Debug, Clone, Default)]
pub struct Collection {
    documents: Vec<Document>,
}

impl Collection {
    /// Build a collection, rejecting duplicate slugs
    pub fn new(documents: Vec<Document>) -> Result<Self, ContentError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for doc in &documents {
            if let Some(first) = seen.insert(&doc.slug, &doc.source) {
                return Err(ContentError::DuplicateSlug {
                    slug: doc.slug.clone(),
                    first: first.to_string(),
                    second: doc.source.clone(),
                });
            }
        }
        Ok(Self { documents })
    }

    /// Apply a transform to every document
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnMut(Document) -> Document,
    {
        // Transforms never touch slugs, so uniqueness still holds
        Self {
            documents: self.documents.into_iter().map(f).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ContentStore for Collection {
    fn documents(&self) -> &[Document] {
        &self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(slug: &str, date: Option<(i32, u32, u32)>) -> Document {
        let mut d = Document::new(slug);
        d.source = format!("{}.md", slug.trim_matches('/'));
        d.date = date.and_then(|(y, m, day)| NaiveDate::from_ymd_opt(y, m, day));
        d
    }

    fn slugs(docs: &[&Document]) -> Vec<String> {
        docs.iter().map(|d| d.slug.clone()).collect()
    }

    fn sample() -> Collection {
        Collection::new(vec![
            doc("/a/", Some((2021, 1, 1))),
            doc("/undated/", None),
            doc("/b/", Some((2021, 6, 1))),
            doc("/c/", Some((2021, 1, 1))),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_desc_puts_undated_last() {
        let store = sample();
        let found = store.find(&Filter::All, SortOrder::Desc);
        assert_eq!(slugs(&found), vec!["/b/", "/a/", "/c/", "/undated/"]);
    }

    #[test]
    fn test_find_asc_puts_undated_first() {
        let store = sample();
        let found = store.find(&Filter::All, SortOrder::Asc);
        assert_eq!(slugs(&found), vec!["/undated/", "/a/", "/c/", "/b/"]);
    }

    #[test]
    fn test_find_with_slug_filters() {
        let store = sample();
        let found = store.find(&Filter::SlugNe("/b/".into()), SortOrder::Desc);
        assert_eq!(slugs(&found), vec!["/a/", "/c/", "/undated/"]);

        let found = store.find(&Filter::SlugEq("/b/".into()), SortOrder::Desc);
        assert_eq!(slugs(&found), vec!["/b/"]);
    }

    #[test]
    fn test_find_one() {
        let store = sample();
        assert_eq!(
            store.find_one(&Filter::SlugEq("/c/".into())).map(|d| d.slug.as_str()),
            Some("/c/")
        );
        assert!(store.find_one(&Filter::SlugEq("/missing/".into())).is_none());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut second = doc("/a/", None);
        second.source = "a/index.md".to_string();
        let err = Collection::new(vec![doc("/a/", None), second]).unwrap_err();
        match err {
            ContentError::DuplicateSlug { slug, first, second } => {
                assert_eq!(slug, "/a/");
                assert_eq!(first, "a.md");
                assert_eq!(second, "a/index.md");
            }
        }
    }
}
