use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::distribution::percentage;
use crate::document::{Document, DocumentSet};

#[derive(Debug, Deserialize)]
struct Lexicon {
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
}

static LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<Lexicon>(raw).expect("valid sentiment lexicon")
});

/// Sentiment bucket of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Returns (positive hits, negative hits).
    /// A lexicon entry counts once however often it occurs.
    pub fn score_text(&self, text: &str) -> (usize, usize) {
        let pos = LEXICON.positive.iter().filter(|w| text.contains(w.as_str())).count();
        let neg = LEXICON.negative.iter().filter(|w| text.contains(w.as_str())).count();
        (pos, neg)
    }

    /// Scores title + content; a tie (including 0–0) is neutral.
    pub fn classify(&self, doc: &Document) -> Sentiment {
        let text = format!("{} {}", doc.title, doc.content);
        let (pos, neg) = self.score_text(&text);
        compare(pos, neg)
    }

    pub fn analyze(&self, docs: &DocumentSet) -> SentimentBreakdown {
        let mut counts = [0usize; 3];
        for d in docs {
            match self.classify(d) {
                Sentiment::Positive => counts[0] += 1,
                Sentiment::Negative => counts[1] += 1,
                Sentiment::Neutral => counts[2] += 1,
            }
        }
        let total = docs.len();
        SentimentBreakdown {
            positive: BucketStat::new(counts[0], total),
            negative: BucketStat::new(counts[1], total),
            neutral: BucketStat::new(counts[2], total),
        }
    }
}

fn compare(pos: usize, neg: usize) -> Sentiment {
    use std::cmp::Ordering;
    match pos.cmp(&neg) {
        Ordering::Greater => Sentiment::Positive,
        Ordering::Less => Sentiment::Negative,
        Ordering::Equal => Sentiment::Neutral,
    }
}

/// Count and share (percent, 2 decimals) of one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStat {
    pub count: usize,
    pub percentage: f64,
}

impl BucketStat {
    fn new(count: usize, total: usize) -> Self {
        Self {
            count,
            percentage: percentage(count, total),
        }
    }
}

/// Per-bucket tallies; counts always sum to the document count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: BucketStat,
    pub negative: BucketStat,
    pub neutral: BucketStat,
}

impl SentimentBreakdown {
    pub fn total(&self) -> usize {
        self.positive.count + self.negative.count + self.neutral.count
    }

    /// Largest bucket; ties go positive, then negative, then neutral.
    pub fn dominant(&self) -> Sentiment {
        let mut best = (Sentiment::Positive, self.positive.count);
        for (s, c) in [
            (Sentiment::Negative, self.negative.count),
            (Sentiment::Neutral, self.neutral.count),
        ] {
            if c > best.1 {
                best = (s, c);
            }
        }
        best.0
    }
}
