// src/ingest/mod.rs
pub mod directory;
pub mod filename;
pub mod types;

pub use crate::ingest::directory::DirectoryLoader;
pub use crate::ingest::types::{DocumentLoader, MemoryLoader};

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_files_total", "Article files seen by the directory loader.");
        describe_counter!("ingest_documents_total", "Documents produced by loaders.");
        describe_counter!(
            "ingest_skipped_total",
            "Files skipped (misnamed, empty or unreadable)."
        );
        describe_histogram!("ingest_load_ms", "Directory load time in milliseconds.");
        describe_gauge!(
            "ingest_last_load_ts",
            "Unix ts when the directory loader last ran."
        );
    });
}

static RE_SCRIPT_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>").expect("script/style regex"));
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[a-z!][^>]*>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// True when `s` contains at least one markup tag.
pub fn looks_like_html(s: &str) -> bool {
    RE_TAGS.is_match(s)
}

/// Strip markup down to readable text:
/// drop script/style blocks, strip tags, decode entities, collapse whitespace.
pub fn clean_html(s: &str) -> String {
    let out = RE_SCRIPT_STYLE.replace_all(s, " ");
    let out = RE_TAGS.replace_all(&out, " ");
    let out = html_escape::decode_html_entities(&out).to_string();
    RE_WS.replace_all(&out, " ").trim().to_string()
}

/// `clean_html` for markup, untouched otherwise.
pub fn clean_text(s: &str) -> String {
    if looks_like_html(s) {
        clean_html(s)
    } else {
        s.to_string()
    }
}
