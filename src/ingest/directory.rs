// src/ingest/directory.rs
//! Loads article files from one data directory.

use anyhow::{Context, Result};
use metrics::{counter, gauge, histogram};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::AnalyticsConfig;
use crate::document::{Document, DocumentSet, RawDocument};
use crate::ingest::filename::{parse_article_name, ARTICLE_EXT};
use crate::ingest::types::DocumentLoader;
use crate::ingest::{clean_text, ensure_metrics_described};

/// Optional fields of a JSON-encoded article body.
#[derive(Debug, Default, Deserialize)]
struct JsonBody {
    title: Option<String>,
    content: Option<String>,
    summary: Option<String>,
}

/// JSON object bodies only; anything else is plain text.
fn parse_json_body(text: &str) -> Option<JsonBody> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
    vendors: BTreeMap<String, String>,
}

impl DirectoryLoader {
    pub fn new(dir: impl Into<PathBuf>, vendors: BTreeMap<String, String>) -> Self {
        Self {
            dir: dir.into(),
            vendors,
        }
    }

    pub fn from_config(cfg: &AnalyticsConfig) -> Self {
        Self::new(cfg.data.dir.clone(), cfg.data.vendors.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Build one document from a file name and its content.
    /// `None` for misnamed files and empty bodies.
    pub fn parse_article(&self, file_name: &str, text: &str) -> Option<Document> {
        let name = parse_article_name(file_name)?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (title, content, summary) = match parse_json_body(text) {
            Some(body) => (body.title.or(name.title), body.content, body.summary),
            None => (name.title, Some(text.to_string()), None),
        };

        let display = self.vendors.get(&name.vendor).cloned();
        Some(Document::from_raw(RawDocument {
            id: Some(name.id),
            title: title.map(|t| clean_text(&t)),
            content: Some(clean_text(&content.unwrap_or_default())),
            summary: summary.map(|s| clean_text(&s)),
            source_id: name.vendor,
            source_display_name: display,
            rank: Some(name.rank),
            timestamp: name.timestamp,
        }))
    }

    async fn article_files(&self) -> Result<Vec<String>> {
        let mut rd = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("reading data dir {}", self.dir.display()))?;
        let mut names = Vec::new();
        while let Some(entry) = rd.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(ARTICLE_EXT) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait::async_trait]
impl DocumentLoader for DirectoryLoader {
    async fn load(&self) -> Result<DocumentSet> {
        ensure_metrics_described();
        let started = Instant::now();

        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            warn!(target: "ingest", dir = %self.dir.display(), "data directory missing");
            return Ok(DocumentSet::new());
        }

        let files = self.article_files().await?;
        counter!("ingest_files_total").increment(files.len() as u64);

        let mut set = DocumentSet::new();
        let mut skipped = 0u64;
        for name in &files {
            let path = self.dir.join(name);
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(t) => t,
                Err(e) => {
                    warn!(target: "ingest", file = %name, error = %e, "unreadable article file");
                    skipped += 1;
                    continue;
                }
            };
            match self.parse_article(name, &text) {
                Some(doc) => {
                    set.push(doc);
                }
                None => {
                    warn!(target: "ingest", file = %name, "misnamed or empty article file skipped");
                    skipped += 1;
                }
            }
        }

        counter!("ingest_skipped_total").increment(skipped);
        counter!("ingest_documents_total").increment(set.len() as u64);
        histogram!("ingest_load_ms").record(started.elapsed().as_secs_f64() * 1000.0);
        gauge!("ingest_last_load_ts").set(chrono::Utc::now().timestamp() as f64);

        info!(
            target: "ingest",
            files = files.len(),
            documents = set.len(),
            skipped,
            "directory load finished"
        );
        debug!(target: "ingest", dir = %self.dir.display(), "loaded");
        Ok(set)
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}
