//! # Search
//! The one substring primitive shared by keyword counting and every
//! keyword → documents lookup, plus list filtering and pagination.

use serde::Serialize;

use crate::document::Document;

/// Upper bound for `per_page` in listings.
pub const MAX_PER_PAGE: usize = 1000;

/// True when `term` occurs (case-insensitive) in title, content or summary.
///
/// An empty term matches every document.
pub fn contains_term(doc: &Document, term: &str) -> bool {
    let needle = term.to_lowercase();
    contains_lowered(doc, &needle)
}

/// Same as [`contains_term`] for a needle that is already lower-cased.
pub(crate) fn contains_lowered(doc: &Document, needle: &str) -> bool {
    Haystack::of(doc).matches(needle)
}

/// Lower-cased searchable fields of one document.
///
/// Lets bulk callers lower-case each document once and probe it many times
/// with the exact same test as [`contains_term`].
#[derive(Debug, Clone)]
pub(crate) struct Haystack {
    title: String,
    content: String,
    summary: String,
}

impl Haystack {
    pub(crate) fn of(doc: &Document) -> Self {
        Self {
            title: doc.title.to_lowercase(),
            content: doc.content.to_lowercase(),
            summary: doc.summary.to_lowercase(),
        }
    }

    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.contains(needle) || self.content.contains(needle) || self.summary.contains(needle)
    }
}

/// Apply the optional search term, then the optional vendor filter.
///
/// The vendor filter accepts either the display name or the source id.
/// Blank filters are ignored.
pub fn filter_documents<'a, I>(docs: I, search: Option<&str>, vendor: Option<&str>) -> Vec<&'a Document>
where
    I: IntoIterator<Item = &'a Document>,
{
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let vendor = vendor.map(str::trim).filter(|v| !v.is_empty());

    docs.into_iter()
        .filter(|d| needle.as_deref().map_or(true, |n| contains_lowered(d, n)))
        .filter(|d| vendor.map_or(true, |v| d.source_display_name == v || d.source_id == v))
        .collect()
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub pages: usize,
}

/// Cut one 1-based page out of `items`.
///
/// `page` 0 is treated as 1; `per_page` is clamped to `1..=MAX_PER_PAGE`.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> (Vec<T>, Pagination) {
    let page = page.max(1);
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let total = items.len();
    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    let meta = Pagination {
        page,
        per_page,
        total,
        pages: total.div_ceil(per_page),
    };
    (items[start..end].to_vec(), meta)
}
