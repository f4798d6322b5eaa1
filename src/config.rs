// src/config.rs
//! Service configuration: `config/analytics.toml` + env overrides + built-in defaults.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyze::keywords::DEFAULT_KEYWORD_LIMIT;
use crate::analyze::tokenizer::{PatternRule, Tokenizer};

pub const DEFAULT_CONFIG_PATH: &str = "config/analytics.toml";
pub const ENV_CONFIG_PATH: &str = "NEWS_ANALYTICS_CONFIG_PATH";
pub const ENV_DATA_DIR: &str = "NEWS_DATA_DIR";
pub const ENV_BIND: &str = "NEWS_ANALYTICS_BIND";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Built-in vendor code → display name map.
pub fn default_seed() -> BTreeMap<String, String> {
    [
        ("weread", "微信读书"),
        ("zhihu", "知乎"),
        ("douban-group", "豆瓣小组"),
        ("xiaohongshu", "小红书"),
        ("toutiao", "今日头条"),
        ("bilibili", "Bilibili"),
        ("36kr", "36氪"),
        ("smzdm", "什么值得买"),
        ("geekpark", "Geekpark"),
        ("ithome", "Ithome"),
        ("sspai", "Sspai"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    /// Vendor code → display name. Replaces the built-in map when present.
    pub vendors: BTreeMap<String, String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DATA_DIR),
            vendors: default_seed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordsConfig {
    pub limit: usize,
    /// Priority rule table; empty means the built-in table.
    pub patterns: Vec<PatternRule>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_KEYWORD_LIMIT,
            patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub keywords: KeywordsConfig,
    pub session: SessionConfig,
}

impl AnalyticsConfig {
    /// Load using env var + fallbacks, then apply value overrides:
    /// 1) $NEWS_ANALYTICS_CONFIG_PATH (must exist)
    /// 2) config/analytics.toml
    /// 3) built-in defaults
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!(
                        "{ENV_CONFIG_PATH} points to non-existent path {}",
                        pb.display()
                    ));
                }
                Self::from_path(&pb)?
            }
            Err(_) => {
                let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
                if pb.exists() {
                    Self::from_path(&pb)?
                } else {
                    info!(target: "config", "no config file, using built-in defaults");
                    Self::default()
                }
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg = Self::from_toml_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(target: "config", path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// Parse and validate; every priority rule must compile.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.tokenizer()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(dir) = non_empty_env(ENV_DATA_DIR) {
            self.data.dir = PathBuf::from(dir);
        }
        if let Some(bind) = non_empty_env(ENV_BIND) {
            self.server.bind = bind;
        }
    }

    /// Tokenizer for the configured rule table (built-in when none).
    pub fn tokenizer(&self) -> Result<Tokenizer> {
        if self.keywords.patterns.is_empty() {
            Ok(Tokenizer::builtin())
        } else {
            Tokenizer::from_rules(&self.keywords.patterns)
        }
    }

    /// Display name for a vendor code; unknown codes display as themselves.
    pub fn vendor_display_name(&self, code: &str) -> String {
        self.data
            .vendors
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const SAMPLE: &str = r#"
[server]
bind = "0.0.0.0:9000"

[data]
dir = "/srv/news"

[data.vendors]
zhihu = "Zhihu"

[keywords]
limit = 20

[[keywords.patterns]]
id = "chips"
pattern = "芯片|半导体"
"#;

    #[test]
    fn parses_full_file() {
        let cfg = AnalyticsConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert_eq!(cfg.data.dir, PathBuf::from("/srv/news"));
        assert_eq!(cfg.vendor_display_name("zhihu"), "Zhihu");
        assert_eq!(cfg.vendor_display_name("toutiao"), "toutiao");
        assert_eq!(cfg.keywords.limit, 20);
        let tk = cfg.tokenizer().unwrap();
        assert_eq!(tk.rule_ids().collect::<Vec<_>>(), vec!["chips"]);
        assert_eq!(cfg.session, SessionConfig::default());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = AnalyticsConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, AnalyticsConfig::default());
        assert_eq!(cfg.vendor_display_name("36kr"), "36氪");
        assert_eq!(cfg.keywords.limit, DEFAULT_KEYWORD_LIMIT);
    }

    #[test]
    fn bad_pattern_is_rejected_with_rule_id() {
        let bad = "[[keywords.patterns]]\nid = \"oops\"\npattern = \"(\"\n";
        let err = AnalyticsConfig::from_toml_str(bad).unwrap_err();
        assert!(format!("{err:#}").contains("oops"));
    }

    #[serial_test::serial]
    #[test]
    fn load_uses_env_path_then_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("analytics.toml");
        fs::write(&p, SAMPLE).unwrap();

        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        env::set_var(ENV_DATA_DIR, "/tmp/override");
        env::remove_var(ENV_BIND);
        let cfg = AnalyticsConfig::load().unwrap();
        assert_eq!(cfg.data.dir, PathBuf::from("/tmp/override"));
        assert_eq!(cfg.server.bind, "0.0.0.0:9000");

        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(AnalyticsConfig::load().is_err());

        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_DATA_DIR);
    }
}
