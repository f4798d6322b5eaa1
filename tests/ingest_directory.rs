// tests/ingest_directory.rs
//
// DirectoryLoader over a temp data dir: ordering, JSON vs text bodies,
// skipped files, duplicates and a missing directory.

use std::fs;

use news_analytics::config::default_seed;
use news_analytics::ingest::{DirectoryLoader, DocumentLoader};

#[tokio::test]
async fn loads_sorted_and_skips_bad_files() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    fs::write(
        dir.join("2025_08_11_14_zhihu_2_上海_交通新规_b2.txt"),
        "地铁 延长 运营时间",
    )
    .unwrap();
    fs::write(
        dir.join("2025_08_11_09_toutiao_1_ignored_a1.txt"),
        r#"{"title":"人工智能 大会","content":"<p>大模型 发布</p>"}"#,
    )
    .unwrap();
    fs::write(dir.join("2025_08_12_10_zhihu_1_empty_c3.txt"), "   ").unwrap();
    fs::write(dir.join("notes.txt"), "not an article").unwrap();
    fs::write(dir.join("2025_08_12_10_zhihu_1_other.json"), "{}").unwrap();
    // same id as b2, later in name order → dropped
    fs::write(dir.join("2025_08_13_10_zhihu_5_dup_b2.txt"), "重复").unwrap();

    let loader = DirectoryLoader::new(dir, default_seed());
    let docs = loader.load().await.unwrap();

    assert_eq!(docs.len(), 2);
    let first = docs.get(0).unwrap();
    assert_eq!(first.id, "a1");
    assert_eq!(first.title, "人工智能 大会");
    assert_eq!(first.content, "大模型 发布");
    assert_eq!(first.source_display_name, "今日头条");
    assert_eq!(first.timestamp, "2025-08-11 09:00:00");

    let second = docs.get(1).unwrap();
    assert_eq!(second.id, "b2");
    assert_eq!(second.title, "上海_交通新规");
    assert_eq!(second.rank, 2);
}

#[tokio::test]
async fn missing_directory_is_empty_not_error() {
    let tmp = tempfile::tempdir().unwrap();
    let loader = DirectoryLoader::new(tmp.path().join("nope"), default_seed());
    let docs = loader.load().await.unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn long_content_is_truncated_with_summary_from_full_text() {
    let tmp = tempfile::tempdir().unwrap();
    let body: String = "新".repeat(700);
    fs::write(tmp.path().join("2025_08_11_14_sspai_1_长文_x1.txt"), &body).unwrap();

    let docs = DirectoryLoader::new(tmp.path(), default_seed())
        .load()
        .await
        .unwrap();
    let d = docs.get(0).unwrap();
    assert_eq!(d.content.chars().count(), 500);
    assert!(d.summary.ends_with("..."));
    assert_eq!(d.source_display_name, "Sspai");
}
