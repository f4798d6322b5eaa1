//! # Documents
//! In-memory document model shared by every analytics component.
//!
//! Ingestion-time normalisation lives here so that every loader produces the
//! same shape: bounded content, a summary fallback, a title placeholder and a
//! rank sentinel.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Max characters of `content` kept at ingestion.
pub const CONTENT_MAX_CHARS: usize = 500;
/// Max characters of `content` used for a fallback summary.
pub const SUMMARY_MAX_CHARS: usize = 200;
/// Appended to a fallback summary cut from longer content.
pub const ELLIPSIS: &str = "...";
/// Title used when the source provides none.
pub const UNTITLED: &str = "无标题";
/// Rank used when the source provides none (or garbage).
pub const DEFAULT_RANK: u32 = 999;
/// Fixed local date-time format of `Document::timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One ingested news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    /// Vendor code, e.g. "zhihu".
    pub source_id: String,
    /// Human-facing vendor name, e.g. "知乎".
    pub source_display_name: String,
    pub rank: u32,
    /// `YYYY-MM-DD HH:MM:SS`, local time. May be malformed.
    pub timestamp: String,
}

/// Loosely-typed document as handed over by a loader, before normalisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub source_display_name: Option<String>,
    /// Rank in its source encoding (filename part, JSON string, ...).
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

impl Document {
    /// Normalise a raw document into the canonical shape.
    pub fn from_raw(raw: RawDocument) -> Self {
        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let full_content = raw.content.unwrap_or_default();
        // Summary is cut from the full content, before truncation.
        let summary = raw
            .summary
            .unwrap_or_else(|| fallback_summary(&full_content));
        let content = truncate_chars(&full_content, CONTENT_MAX_CHARS);

        let id = raw
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fingerprint(&title, &full_content));

        let source_display_name = raw
            .source_display_name
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| raw.source_id.clone());

        Self {
            id,
            title,
            content,
            summary,
            source_id: raw.source_id,
            source_display_name,
            rank: parse_rank(raw.rank.as_deref()),
            timestamp: raw.timestamp,
        }
    }

    /// Parsed timestamp, `None` when malformed.
    pub fn parsed_timestamp(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDateTime::parse_from_str(self.timestamp.trim(), TIMESTAMP_FORMAT).ok()
    }
}

/// First `max` characters of `s` (char-boundary safe).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

fn fallback_summary(content: &str) -> String {
    if content.chars().count() > SUMMARY_MAX_CHARS {
        let mut out = truncate_chars(content, SUMMARY_MAX_CHARS);
        out.push_str(ELLIPSIS);
        out
    } else {
        content.to_string()
    }
}

fn parse_rank(raw: Option<&str>) -> u32 {
    raw.and_then(|r| r.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_RANK)
}

/// Stable 8-hex-digit id derived from title + content.
pub fn fingerprint(title: &str, content: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(8);
    for b in digest.iter().take(4) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Ordered collection of documents, unique by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocumentSet {
    docs: Vec<Document>,
    #[serde(skip)]
    ids: HashSet<String>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set keeping the first document for every id.
    pub fn from_documents<I>(docs: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut set = Self::new();
        for d in docs {
            set.push(d);
        }
        set
    }

    /// Append a document; returns `false` (and drops it) on a duplicate id.
    pub fn push(&mut self, doc: Document) -> bool {
        if !self.ids.insert(doc.id.clone()) {
            warn!(target: "ingest", id = %doc.id, "duplicate document id dropped");
            return false;
        }
        self.docs.push(doc);
        true
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.docs.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Document> {
        self.docs.get(idx)
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.docs
    }

    pub fn into_vec(self) -> Vec<Document> {
        self.docs
    }
}

impl FromIterator<Document> for DocumentSet {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self::from_documents(iter)
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}
