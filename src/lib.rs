// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod distribution;
pub mod document;
pub mod metrics;
pub mod report;
pub mod search;
pub mod sentiment;
pub mod session;

// Keyword pipeline (tokenizer, word filter, keyword index builder)
pub mod analyze;

// Document loaders
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::document::{Document, DocumentSet, RawDocument};
pub use crate::report::{AnalyticsEngine, AnalyticsSession, Report};
