// src/ingest/filename.rs
//! Article file names: `YYYY_MM_DD_HH_vendor_rank_title..._id.txt`.

pub const ARTICLE_EXT: &str = ".txt";
/// Minimum `_`-separated parts of a valid name.
const MIN_PARTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleName {
    pub vendor: String,
    /// Raw rank part; may be non-numeric.
    pub rank: String,
    /// Parts between rank and id joined back with `_`; `None` when there are none.
    pub title: Option<String>,
    pub id: String,
    /// `YYYY-MM-DD HH:00:00`
    pub timestamp: String,
}

/// Parse a file name; `None` when it does not follow the article pattern.
pub fn parse_article_name(file_name: &str) -> Option<ArticleName> {
    let stem = file_name.strip_suffix(ARTICLE_EXT)?;
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < MIN_PARTS {
        return None;
    }

    let (year, month, day, hour) = (parts[0], parts[1], parts[2], parts[3]);
    let title_parts: &[&str] = if parts.len() > MIN_PARTS + 1 {
        &parts[MIN_PARTS..parts.len() - 1]
    } else {
        &[]
    };

    Some(ArticleName {
        vendor: parts[4].to_string(),
        rank: parts[5].to_string(),
        title: (!title_parts.is_empty()).then(|| title_parts.join("_")),
        id: parts[parts.len() - 1].to_string(),
        timestamp: format!("{year}-{month}-{day} {hour}:00:00"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_name() {
        let n = parse_article_name("2025_08_11_14_weread_1_我在监狱服刑的日子_ecc99523.txt").unwrap();
        assert_eq!(n.vendor, "weread");
        assert_eq!(n.rank, "1");
        assert_eq!(n.title.as_deref(), Some("我在监狱服刑的日子"));
        assert_eq!(n.id, "ecc99523");
        assert_eq!(n.timestamp, "2025-08-11 14:00:00");
    }

    #[test]
    fn underscores_in_title_are_kept() {
        let n = parse_article_name("2025_08_11_09_zhihu_x_a_b_c_id9.txt").unwrap();
        assert_eq!(n.title.as_deref(), Some("a_b_c"));
        assert_eq!(n.rank, "x");
        assert_eq!(n.id, "id9");
    }

    #[test]
    fn short_or_foreign_names_are_rejected() {
        assert!(parse_article_name("2025_08_11_14_zhihu.txt").is_none());
        assert!(parse_article_name("2025_08_11_14_zhihu_1_t_id.json").is_none());
        assert!(parse_article_name("notes.txt").is_none());
    }

    #[test]
    fn no_title_parts() {
        let n = parse_article_name("2025_08_11_14_zhihu_3_abc.txt").unwrap();
        assert!(n.title.is_none());
        assert_eq!(n.id, "abc");
    }
}
