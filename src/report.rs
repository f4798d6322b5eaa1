//! # Analytics report
//! Folds keywords, sentiment, vendor and time distributions into one
//! [`Report`], and keeps a session-scoped keyword index for lookups.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyze::keywords::{KeywordEntry, KeywordIndex, KeywordIndexBuilder, DEFAULT_KEYWORD_LIMIT};
use crate::analyze::tokenizer::Tokenizer;
use crate::distribution::{time_distribution, vendor_distribution, TimeDistribution, VendorDistribution};
use crate::document::{Document, DocumentSet};
use crate::sentiment::{Sentiment, SentimentAnalyzer, SentimentBreakdown};

/// `most_active_vendor` of an empty report.
pub const NO_VENDOR: &str = "无";
/// Keywords repeated in the summary highlights.
pub const SUMMARY_TOP_KEYWORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub top_keywords: Vec<String>,
    pub dominant_sentiment: Sentiment,
    pub most_active_vendor: String,
    pub peak_hour: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_articles: usize,
    pub keywords: Vec<KeywordEntry>,
    pub vendor_distribution: VendorDistribution,
    pub sentiment_analysis: SentimentBreakdown,
    pub time_distribution: TimeDistribution,
    /// Local time, RFC 3339.
    pub last_updated: String,
    pub analysis_summary: AnalysisSummary,
}

/// Stateless report builder. Cheap to clone and share.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    builder: KeywordIndexBuilder,
    sentiment: SentimentAnalyzer,
    keyword_limit: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(Tokenizer::builtin(), DEFAULT_KEYWORD_LIMIT)
    }
}

impl AnalyticsEngine {
    pub fn new(tokenizer: Tokenizer, keyword_limit: usize) -> Self {
        Self {
            builder: KeywordIndexBuilder::new(tokenizer),
            sentiment: SentimentAnalyzer::new(),
            keyword_limit,
        }
    }

    pub fn keyword_limit(&self) -> usize {
        self.keyword_limit
    }

    pub fn keyword_builder(&self) -> &KeywordIndexBuilder {
        &self.builder
    }

    /// Report for `docs` without keeping the index.
    pub fn build_report(&self, docs: &DocumentSet) -> Report {
        self.analyze(docs).0
    }

    /// Report plus the keyword index built by the same pass.
    pub fn analyze(&self, docs: &DocumentSet) -> (Report, KeywordIndex) {
        let extraction = self.builder.extract(docs, self.keyword_limit);
        let vendor_distribution = vendor_distribution(docs);
        let sentiment_analysis = self.sentiment.analyze(docs);
        let time_distribution = time_distribution(docs);

        let analysis_summary = AnalysisSummary {
            top_keywords: extraction
                .keywords
                .iter()
                .take(SUMMARY_TOP_KEYWORDS)
                .map(|k| k.term.clone())
                .collect(),
            dominant_sentiment: sentiment_analysis.dominant(),
            most_active_vendor: vendor_distribution
                .vendors
                .first()
                .map(|v| v.name.clone())
                .unwrap_or_else(|| NO_VENDOR.to_string()),
            peak_hour: time_distribution.peak_hour(),
        };

        debug!(
            target: "report",
            documents = docs.len(),
            keywords = extraction.keywords.len(),
            "report built"
        );

        let report = Report {
            total_articles: docs.len(),
            keywords: extraction.keywords,
            vendor_distribution,
            sentiment_analysis,
            time_distribution,
            last_updated: chrono::Local::now().to_rfc3339(),
            analysis_summary,
        };
        (report, extraction.index)
    }
}

/// One caller's view: a document snapshot plus the index of its last extraction.
#[derive(Debug, Clone)]
pub struct AnalyticsSession {
    engine: AnalyticsEngine,
    documents: DocumentSet,
    index: Option<KeywordIndex>,
}

impl AnalyticsSession {
    pub fn new(engine: AnalyticsEngine, documents: DocumentSet) -> Self {
        Self {
            engine,
            documents,
            index: None,
        }
    }

    /// Resume a session with an index built earlier over the same documents.
    pub fn with_index(engine: AnalyticsEngine, documents: DocumentSet, index: Option<KeywordIndex>) -> Self {
        Self {
            engine,
            documents,
            index,
        }
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn index(&self) -> Option<&KeywordIndex> {
        self.index.as_ref()
    }

    pub fn into_parts(self) -> (DocumentSet, Option<KeywordIndex>) {
        (self.documents, self.index)
    }

    /// Full report; replaces the session index.
    pub fn get_report(&mut self) -> Report {
        let (report, index) = self.engine.analyze(&self.documents);
        self.index = Some(index);
        report
    }

    /// Top `limit` keywords; replaces the session index.
    pub fn get_keywords(&mut self, limit: usize) -> Vec<KeywordEntry> {
        let extraction = self.engine.keyword_builder().extract(&self.documents, limit);
        self.index = Some(extraction.index);
        extraction.keywords
    }

    /// Documents of the last extraction containing `term`; empty before any extraction.
    pub fn get_documents_for_keyword(&self, term: &str) -> Vec<Document> {
        match &self.index {
            Some(index) => index
                .documents(term, &self.documents)
                .into_iter()
                .cloned()
                .collect(),
            None => {
                warn!(target: "session", term, "keyword lookup before any extraction");
                Vec::new()
            }
        }
    }
}
