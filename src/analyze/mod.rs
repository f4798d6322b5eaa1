// src/analyze/mod.rs
//! Keyword pipeline: tokenizer → word filter → keyword index builder.

pub mod filter;
pub mod keywords;
pub mod tokenizer;

// Re-export convenient types.
pub use crate::analyze::filter::{is_meaningful, is_stopword, is_valid_keyword};
pub use crate::analyze::keywords::{
    Extraction, KeywordEntry, KeywordIndex, KeywordIndexBuilder, DEFAULT_KEYWORD_LIMIT,
};
pub use crate::analyze::tokenizer::{PatternRule, Tokenizer, BUILTIN_RULES};
