// src/ingest/types.rs
use anyhow::Result;

use crate::document::DocumentSet;

/// Source of a fresh document snapshot.
#[async_trait::async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self) -> Result<DocumentSet>;
    fn name(&self) -> &'static str;
}

/// Fixed in-memory snapshot; handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: DocumentSet,
}

impl MemoryLoader {
    pub fn new(documents: DocumentSet) -> Self {
        Self { documents }
    }
}

#[async_trait::async_trait]
impl DocumentLoader for MemoryLoader {
    async fn load(&self) -> Result<DocumentSet> {
        Ok(self.documents.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
