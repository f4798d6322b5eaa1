//! Word filter: decides whether a candidate string is worth reporting as a keyword.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Shortest keyword, in characters.
pub const MIN_WORD_CHARS: usize = 2;
/// Longest keyword, in characters.
pub const MAX_WORD_CHARS: usize = 8;

/// Function words, temporal deictics, discourse connectives and light verbs.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // function words
        "的", "了", "和", "是", "在", "有", "个", "不", "我", "你", "他", "她", "它", "们",
        "都", "被", "把", "让", "使", "对", "为", "从", "到", "与", "及", "或", "但", "而",
        "却", "只", "就", "还", "也", "又", "再", "更", "最", "很", "非常", "特别", "尤其",
        "如果", "因为", "所以", "虽然", "然而", "不过", "可是", "但是", "于是", "然后",
        "接着", "后来", "最后", "首先", "其次", "再次", "最终", "年", "月", "日", "时",
        "今天", "明天", "昨天", "今年", "去年", "明年", "现在", "目前", "已经", "正在",
        // directional complements and demonstratives
        "来了", "出来", "进来", "过来", "起来", "下来", "上来", "回来", "出去", "进去",
        "过去", "起去", "下去", "上去", "回去", "这个", "那个", "这些", "那些", "这样",
        "那样", "如此", "这里", "那里", "这边", "那边", "这时", "那时", "当时",
        "一个", "一些", "一样", "一直", "一起", "一下", "一次", "一般", "一点", "一种",
        // modal and perception verbs
        "可以", "应该", "能够", "必须", "需要", "想要", "希望", "觉得", "认为", "知道",
        "看到", "听到", "感到", "发现", "遇到", "碰到", "找到", "得到", "拿到", "收到",
        // interrogatives
        "什么", "怎么", "为什么", "哪里", "哪个", "哪些", "多少", "几个", "怎样", "如何",
        // prepositional phrases
        "关于", "由于", "根据", "按照", "通过", "经过", "依据", "基于", "鉴于", "考虑",
        // reporting verbs
        "表示", "显示", "说明", "证明", "反映", "体现", "代表", "意味", "标志", "象征",
        // light verbs
        "进行", "实施", "执行", "开展", "推进", "促进", "加强", "提高", "增加", "减少",
        // quantifiers and connectives
        "会有", "将有", "已有", "还有", "只有", "没有", "所有", "全部", "整个", "各种",
        "包括", "除了", "除此", "另外", "此外", "而且", "并且", "同时", "还是", "或者",
    ]
    .into_iter()
    .collect()
});

/// Grammatically empty fragments that slip through punctuation splitting.
static MEANINGLESS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "的了", "是的", "这个", "那个", "如果", "因为", "所以", "然后", "接着", "首先", "其次",
        "最终", "时候", "什么", "怎么", "哪里",
    ]
    .into_iter()
    .collect()
});

/// Protocol and markup debris (compared lower-case).
static WEB_NOISE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "com", "www", "http", "https", "html", "json", "null", "true", "false", "url", "src",
        "img", "div", "span", "css", "js",
    ]
    .into_iter()
    .collect()
});

const NULL_SENTINELS: [&str; 4] = ["None", "null", "undefined", ""];

/// Length, repetition, noise and meaningless-list checks.
pub fn is_meaningful(word: &str) -> bool {
    let len = word.chars().count();
    if !(MIN_WORD_CHARS..=MAX_WORD_CHARS).contains(&len) {
        return false;
    }

    if word
        .chars()
        .all(|c| c.is_numeric() || c.is_whitespace() || c.is_ascii_punctuation())
    {
        return false;
    }

    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return false;
        }
    }

    if MEANINGLESS.contains(word) {
        return false;
    }

    if is_ascii_word(word) && WEB_NOISE.contains(word.to_ascii_lowercase().as_str()) {
        return false;
    }

    true
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Meaningful, not a stopword, not a null sentinel.
pub fn is_valid_keyword(word: &str) -> bool {
    let word = word.trim();
    is_meaningful(word) && !is_stopword(word) && !NULL_SENTINELS.contains(&word)
}

/// Pure ASCII letters, nothing else.
pub(crate) fn is_ascii_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}
