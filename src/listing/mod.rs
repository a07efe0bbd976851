//! Listing selection
//!
//! Splits a document collection into an optional featured document and the
//! remaining documents, newest first. Every listing page goes through
//! [`select`]: a plain index passes no featured slug, an article page
//! passes the slug of the document it embeds.

use std::collections::HashSet;

use crate::content::{Document, SortOrder};

/// Result of a selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    /// Document whose slug equals the requested featured slug
    pub featured: Option<&'a Document>,
    /// Every other document, by date descending
    pub remainder: Vec<&'a Document>,
}

impl<'a> Selection<'a> {
    /// Number of distinct documents in the selection
    pub fn len(&self) -> usize {
        self.remainder.len() + usize::from(self.featured.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Select the featured document and order the rest.
///
/// `all` may be in any order. A `featured_slug` matching nothing is not an
/// error: `featured` is `None` and the remainder holds every document.
/// Equal dates keep their order in `all`. Should `all` contain a slug more
/// than once, only its first occurrence is kept.
pub fn select<'a>(all: &'a [Document], featured_slug: Option<&str>) -> Selection<'a> {
    let featured = featured_slug.and_then(|slug| all.iter().find(|doc| doc.slug == slug));

    let mut seen = HashSet::with_capacity(all.len());
    let mut remainder: Vec<&Document> = all
        .iter()
        .filter(|doc| Some(doc.slug.as_str()) != featured_slug)
        .filter(|&doc| seen.insert(doc.slug.as_str()))
        .collect();
    SortOrder::Desc.sort(&mut remainder);

    Selection {
        featured,
        remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn doc(slug: &str, y: i32, m: u32, d: u32) -> Document {
        Document::new(slug).with_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn slugs(docs: &[&Document]) -> Vec<String> {
        docs.iter().map(|d| d.slug.clone()).collect()
    }

    fn assert_descending(docs: &[&Document]) {
        for pair in docs.windows(2) {
            assert!(
                pair[0].date >= pair[1].date,
                "{} ({:?}) listed before {} ({:?})",
                pair[0].slug,
                pair[0].date,
                pair[1].slug,
                pair[1].date
            );
        }
    }

    fn mixed() -> Vec<Document> {
        vec![
            doc("/c/", 2020, 3, 1),
            Document::new("/undated/"),
            doc("/a/", 2021, 1, 1),
            doc("/tdd-react/", 2020, 1, 1),
            doc("/b/", 2021, 6, 1),
            doc("/a-twin/", 2021, 1, 1),
        ]
    }

    #[test]
    fn test_plain_listing_sorts_newest_first() {
        let docs = vec![doc("/a", 2021, 1, 1), doc("/b", 2021, 6, 1)];
        let selection = select(&docs, None);
        assert!(selection.featured.is_none());
        assert_eq!(slugs(&selection.remainder), vec!["/b", "/a"]);
    }

    #[test]
    fn test_featured_is_split_from_remainder() {
        let docs = vec![doc("/tdd-react/", 2020, 1, 1), doc("/x", 2021, 1, 1)];
        let selection = select(&docs, Some("/tdd-react/"));
        assert_eq!(selection.featured.unwrap().slug, "/tdd-react/");
        assert_eq!(slugs(&selection.remainder), vec!["/x"]);
    }

    #[test]
    fn test_missing_featured_keeps_everything() {
        let docs = vec![doc("/x", 2021, 1, 1)];
        let selection = select(&docs, Some("/missing"));
        assert!(selection.featured.is_none());
        assert_eq!(slugs(&selection.remainder), vec!["/x"]);
    }

    #[test]
    fn test_without_featured_remainder_is_whole_collection() {
        let docs = mixed();
        let selection = select(&docs, None);
        assert!(selection.featured.is_none());
        assert_eq!(selection.remainder.len(), docs.len());
        assert_descending(&selection.remainder);
    }

    #[test]
    fn test_featured_never_in_remainder() {
        let docs = mixed();
        for target in &docs {
            let selection = select(&docs, Some(&target.slug));
            assert_eq!(selection.featured.map(|d| &d.slug), Some(&target.slug));
            assert!(selection.remainder.iter().all(|d| d.slug != target.slug));
            assert_eq!(selection.remainder.len(), docs.len() - 1);
            assert_eq!(selection.len(), docs.len());
            assert_descending(&selection.remainder);
        }
    }

    #[test]
    fn test_unmatched_featured_keeps_length() {
        let docs = mixed();
        let selection = select(&docs, Some("/nope/"));
        assert!(selection.featured.is_none());
        assert_eq!(selection.remainder.len(), docs.len());
    }

    #[test]
    fn test_ties_keep_input_order_and_undated_last() {
        let docs = mixed();
        let selection = select(&docs, None);
        assert_eq!(
            slugs(&selection.remainder),
            vec!["/b/", "/a/", "/a-twin/", "/c/", "/tdd-react/", "/undated/"]
        );

        let mut reversed = docs.clone();
        reversed.reverse();
        let selection = select(&reversed, None);
        assert_eq!(
            slugs(&selection.remainder),
            vec!["/b/", "/a-twin/", "/a/", "/c/", "/tdd-react/", "/undated/"]
        );
    }

    #[test]
    fn test_select_is_deterministic() {
        let docs = mixed();
        let first = select(&docs, Some("/c/"));
        let second = select(&docs, Some("/c/"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_slugs_emitted_once() {
        let docs = vec![
            doc("/dup/", 2021, 1, 1),
            doc("/other/", 2021, 2, 1),
            doc("/dup/", 2022, 1, 1),
        ];
        let selection = select(&docs, None);
        assert_eq!(slugs(&selection.remainder), vec!["/other/", "/dup/"]);
        assert_eq!(selection.remainder[1].date, NaiveDate::from_ymd_opt(2021, 1, 1));

        let selection = select(&docs, Some("/dup/"));
        assert_eq!(selection.featured.unwrap().date, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(slugs(&selection.remainder), vec!["/other/"]);
    }

    #[test]
    fn test_empty_collection() {
        let selection = select(&[], Some("/tdd-react/"));
        assert!(selection.featured.is_none());
        assert!(selection.is_empty());
    }
}
