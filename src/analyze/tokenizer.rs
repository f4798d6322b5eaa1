//! Heuristic bilingual segmenter.
//!
//! Two passes over one text field:
//! 1. an ordered table of priority rules (case-insensitive regexes) protects
//!    curated multi-character terms from fragmentation,
//! 2. the text is split on punctuation/whitespace and fragments are kept by
//!    script class (pure CJK or pure ASCII letters).
//!
//! The final pass runs every candidate through the word filter and drops
//! duplicates, keeping first-seen order.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analyze::filter::{is_ascii_word, is_valid_keyword, MAX_WORD_CHARS, MIN_WORD_CHARS};

/// Longest pure-CJK fragment considered a "word" on its own.
/// Longer fragments are kept whole rather than split into pairs.
pub const CJK_SPLIT_THRESHOLD: usize = 6;

/// One entry of the priority rule table, as written in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub id: String,
    pub pattern: String,
}

impl PatternRule {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
        }
    }
}

/// Built-in rule table, used when config provides none.
pub const BUILTIN_RULES: &[(&str, &str)] = &[
    (
        "tech",
        r"人工智能|机器学习|深度学习|神经网络|大模型|云计算|区块链|物联网",
    ),
    (
        "online_governance",
        r"直播乱象|网络暴力|虚假宣传|数据泄露|隐私保护|网络诈骗|电信诈骗",
    ),
    (
        "enforcement",
        r"网警|执法|监管|治理|整治|规范|净网|清朗|专项行动|双管齐下|严厉打击",
    ),
    (
        "diplomacy",
        r"联合声明|经贸会谈|会议|会谈|峰会|论坛|发布会|外交|国际合作",
    ),
    (
        "trade",
        r"中美|中欧|中日|中韩|斯德哥尔摩|贸易|关税|制裁|协议|谈判",
    ),
    (
        "public_policy",
        r"政策|法规|管理|服务|教育|医疗|就业|住房|交通|环保|安全",
    ),
    (
        "industry",
        r"科技|金融|地产|汽车|医药|零售|制造|能源|通信|媒体|文化|体育",
    ),
    (
        "tech_acronyms",
        r"GPT-?\d*|ChatGPT|AI|VR|AR|5G|6G|NFT|Web3|DeFi|DAO",
    ),
    (
        "cities",
        r"北京|上海|广州|深圳|杭州|成都|重庆|武汉|西安|南京|天津",
    ),
];

/// ASCII and CJK punctuation; every run collapses to one separator.
static PUNCT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[。，！？：；、“”‘’（）【】《》〈〉\[\]().,!?:;'"\-_=+|\\/@#$%^&*~`]+"#)
        .expect("punctuation regex")
});

static BUILTIN: Lazy<Tokenizer> = Lazy::new(|| {
    let rules: Vec<PatternRule> = BUILTIN_RULES
        .iter()
        .map(|(id, p)| PatternRule::new(*id, *p))
        .collect();
    Tokenizer::from_rules(&rules).expect("built-in priority rules compile")
});

#[derive(Debug, Clone)]
struct CompiledRule {
    id: String,
    re: Regex,
}

/// Segmenter configured with an ordered priority rule table.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    rules: Vec<CompiledRule>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Tokenizer {
    /// Tokenizer over [`BUILTIN_RULES`].
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Compile a rule table in order; rule order is match priority.
    pub fn from_rules(rules: &[PatternRule]) -> anyhow::Result<Self> {
        let rules = rules
            .iter()
            .map(|r| {
                let re = RegexBuilder::new(&r.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| anyhow::anyhow!("priority rule `{}` regex error: {}", r.id, e))?;
                Ok(CompiledRule {
                    id: r.id.clone(),
                    re,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Rule ids in priority order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|r| r.id.as_str())
    }

    /// Candidate words of `text` after the word filter, de-duplicated, first-seen order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.segment(text)
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| is_valid_keyword(w) && seen.insert(w.clone()))
            .collect()
    }

    /// Raw segmentation (priority matches, then script-classified fragments),
    /// before the word filter runs.
    pub fn segment(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut matched: HashSet<String> = HashSet::new();

        // 1) priority rules; each rescans the whole text
        for rule in &self.rules {
            for m in rule.re.find_iter(text) {
                let hit = m.as_str();
                let n = hit.chars().count();
                if (MIN_WORD_CHARS..=MAX_WORD_CHARS).contains(&n) && matched.insert(hit.to_string())
                {
                    out.push(hit.to_string());
                }
            }
        }

        // 2) punctuation split
        let cleaned = PUNCT.replace_all(text, " ");

        // 3) script classification
        for frag in cleaned.split_whitespace() {
            if frag.chars().count() < MIN_WORD_CHARS || matched.contains(frag) {
                continue;
            }
            if is_cjk_word(frag) {
                // > CJK_SPLIT_THRESHOLD is kept whole too; pair-splitting yields junk.
                out.push(frag.to_string());
            } else if is_ascii_word(frag) && frag.len() <= MAX_WORD_CHARS {
                out.push(frag.to_string());
            }
        }

        out
    }
}

fn is_cjk_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}
