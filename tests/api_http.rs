// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use news_analytics::api::{self, AppState};
use news_analytics::ingest::{DocumentLoader, MemoryLoader};
use news_analytics::session::SessionStore;
use news_analytics::{AnalyticsEngine, Document, DocumentSet, RawDocument};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn doc(id: &str, title: &str, vendor: &str, rank: &str, ts: &str) -> Document {
    Document::from_raw(RawDocument {
        id: Some(id.into()),
        title: Some(title.into()),
        content: Some(format!("{title} 正文")),
        source_id: vendor.into(),
        source_display_name: Some(vendor.to_uppercase()),
        rank: Some(rank.into()),
        timestamp: ts.into(),
        ..Default::default()
    })
}

fn corpus() -> DocumentSet {
    DocumentSet::from_documents(vec![
        doc("1", "人工智能 大会 上海", "zhihu", "3", "2025-08-11 09:00:00"),
        doc("2", "上海 交通 新规", "toutiao", "1", "2025-08-11 10:00:00"),
        doc("3", "人工智能 芯片 出口", "zhihu", "2", "2025-08-12 21:00:00"),
    ])
}

struct Shared {
    app: Router,
    sessions: Arc<SessionStore>,
}

fn test_app_with(loader: Arc<dyn DocumentLoader>) -> Shared {
    let sessions = Arc::new(SessionStore::new(Duration::from_secs(60), 8));
    let state = AppState::new(AnalyticsEngine::default(), loader, sessions.clone());
    Shared {
        app: api::router(state),
        sessions,
    }
}

fn test_app() -> Shared {
    test_app_with(Arc::new(MemoryLoader::new(corpus())))
}

async fn get(app: &Router, uri: &str, session: Option<&str>) -> (StatusCode, Json) {
    let mut req = Request::builder().method("GET").uri(uri);
    if let Some(s) = session {
        req = req.header("X-Session-Id", s);
    }
    let req = req.body(Body::empty()).expect("build request");
    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_app().app;
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");
    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn analytics_report_has_envelope_and_contract_fields() {
    let t = test_app();
    let (status, v) = get(&t.app, "/api/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], true);
    assert!(v.get("error").is_none());

    let data = &v["data"];
    assert_eq!(data["total_articles"], 3);
    assert!(data["keywords"].as_array().is_some_and(|k| !k.is_empty()));
    let first = &data["keywords"][0];
    assert!(first.get("name").is_some() && first.get("value").is_some());
    assert_eq!(data["vendor_distribution"]["total_vendors"], 2);
    assert_eq!(data["analysis_summary"]["most_active_vendor"], "ZHIHU");
    assert!(data["sentiment_analysis"]["neutral"]["count"].is_u64());
    assert!(data["last_updated"].is_string());

    // no session header → nothing cached
    assert!(t.sessions.is_empty());
}

#[tokio::test]
async fn keyword_documents_need_a_prior_extraction_in_the_session() {
    let t = test_app();

    let uri = "/api/analytics/keywords/%E4%B8%8A%E6%B5%B7/documents"; // 上海
    let (_, before) = get(&t.app, uri, Some("s1")).await;
    assert_eq!(before["success"], true);
    assert_eq!(before["data"]["total"], 0);

    let (status, kw) = get(&t.app, "/api/analytics/keywords?limit=5", Some("s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(kw["data"]["keywords"].as_array().unwrap().len() <= 5);
    assert_eq!(kw["data"]["total_articles"], 3);
    assert_eq!(t.sessions.len(), 1);

    let (_, after) = get(&t.app, uri, Some("s1")).await;
    assert_eq!(after["data"]["keyword"], "上海");
    assert_eq!(after["data"]["total"], 2);

    // another session never sees s1's index
    let (_, other) = get(&t.app, uri, Some("s2")).await;
    assert_eq!(other["data"]["total"], 0);
}

#[tokio::test]
async fn news_listing_filters_and_paginates() {
    let t = test_app();
    let (status, v) = get(&t.app, "/api/news?page=1&per_page=1&vendor=zhihu", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &v["data"];
    assert_eq!(data["pagination"]["total"], 2);
    assert_eq!(data["pagination"]["pages"], 2);
    assert_eq!(data["articles"].as_array().unwrap().len(), 1);
    // newest first
    assert_eq!(data["articles"][0]["id"], "3");
    assert_eq!(data["vendors"], serde_json::json!(["TOUTIAO", "ZHIHU"]));
    assert_eq!(data["vendor_stats"]["ZHIHU"], 2);
}

#[tokio::test]
async fn news_by_keyword_is_sorted_by_rank() {
    let t = test_app();
    let uri = "/api/news/by-keyword/%E4%BA%BA%E5%B7%A5%E6%99%BA%E8%83%BD"; // 人工智能
    let (_, v) = get(&t.app, uri, None).await;
    assert_eq!(v["data"]["total"], 2);
    assert_eq!(v["data"]["articles"][0]["id"], "3");
    assert_eq!(v["data"]["articles"][1]["id"], "1");
}

#[tokio::test]
async fn stats_and_trends() {
    let t = test_app();
    let (_, s) = get(&t.app, "/api/stats", None).await;
    assert_eq!(s["data"]["total_articles"], 3);
    assert_eq!(s["data"]["vendor_stats"]["ZHIHU"], 2);
    assert_eq!(s["data"]["date_stats"][0]["date"], "2025-08-12");

    let (_, tr) = get(&t.app, "/api/analytics/trends", None).await;
    assert_eq!(tr["data"][0]["vendor"], "ZHIHU");
    assert_eq!(tr["data"][0]["total"], 2);
}

struct FailingLoader;

#[async_trait::async_trait]
impl DocumentLoader for FailingLoader {
    async fn load(&self) -> anyhow::Result<DocumentSet> {
        Err(anyhow::anyhow!("disk on fire"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[tokio::test]
async fn loader_failure_is_a_500_envelope() {
    let t = test_app_with(Arc::new(FailingLoader));
    let (status, v) = get(&t.app, "/api/analytics", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v["success"], false);
    assert!(v["error"].as_str().unwrap().contains("disk on fire"));
    assert!(v.get("data").is_none());
}

#[tokio::test]
async fn empty_corpus_is_a_successful_zero_report() {
    let t = test_app_with(Arc::new(MemoryLoader::default()));
    let (status, v) = get(&t.app, "/api/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["total_articles"], 0);
    assert_eq!(v["data"]["keywords"], serde_json::json!([]));
    assert_eq!(v["data"]["analysis_summary"]["most_active_vendor"], "无");
}
