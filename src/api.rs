//! HTTP surface: axum router over the analytics core.
//!
//! Every JSON route answers with the envelope `{success, data?, error?}`.
//! Each request loads a fresh document snapshot; keyword indices are cached
//! per `X-Session-Id` in the [`SessionStore`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::analyze::keywords::KeywordEntry;
use crate::config::AnalyticsConfig;
use crate::distribution::{news_stats, vendor_trends, NewsStats, VendorTrend};
use crate::document::{Document, DocumentSet};
use crate::ingest::{DirectoryLoader, DocumentLoader};
use crate::report::{AnalyticsEngine, AnalyticsSession, Report};
use crate::search::{filter_documents, paginate, Pagination};
use crate::session::{SessionStore, SESSION_HEADER};

pub const DEFAULT_PER_PAGE: usize = 20;

#[derive(Clone)]
pub struct AppState {
    engine: AnalyticsEngine,
    loader: Arc<dyn DocumentLoader>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(engine: AnalyticsEngine, loader: Arc<dyn DocumentLoader>, sessions: Arc<SessionStore>) -> Self {
        Self {
            engine,
            loader,
            sessions,
        }
    }

    /// State wired from config: configured tokenizer, directory loader, session store.
    pub fn from_config(cfg: &AnalyticsConfig) -> anyhow::Result<Self> {
        let engine = AnalyticsEngine::new(cfg.tokenizer()?, cfg.keywords.limit);
        let loader: Arc<dyn DocumentLoader> = Arc::new(DirectoryLoader::from_config(cfg));
        let sessions = Arc::new(SessionStore::new(
            Duration::from_secs(cfg.session.ttl_secs),
            cfg.session.max_sessions,
        ));
        Ok(Self::new(engine, loader, sessions))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    async fn load(&self) -> Result<DocumentSet, ApiError> {
        self.loader.load().await.map_err(|e| {
            counter!("api_load_errors_total").increment(1);
            error!(target: "api", loader = self.loader.name(), error = %format!("{e:#}"), "document load failed");
            ApiError(e)
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/analytics", get(analytics))
        .route("/api/analytics/keywords", get(keywords))
        .route("/api/analytics/keywords/{term}/documents", get(keyword_documents))
        .route("/api/analytics/trends", get(trends))
        .route("/api/news", get(news))
        .route("/api/news/by-keyword/{keyword}", get(news_by_keyword))
        .route("/api/stats", get(stats))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data: Some(data),
        error: None,
    })
}

/// Loader failure surfaced as a 500 envelope.
pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            success: false,
            data: None,
            error: Some(format!("{:#}", self.0)),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn hit(route: &'static str) {
    counter!("api_requests_total", "route" => route).increment(1);
}

async fn analytics(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Report> {
    hit("/api/analytics");
    let docs = state.load().await?;
    let (report, index) = state.engine.analyze(&docs);
    if let Some(id) = session_id(&headers) {
        state.sessions.put(&id, docs, index);
    }
    Ok(ok(report))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct KeywordsData {
    keywords: Vec<KeywordEntry>,
    total_articles: usize,
    analysis_time: String,
}

async fn keywords(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<LimitQuery>,
) -> ApiResult<KeywordsData> {
    hit("/api/analytics/keywords");
    let docs = state.load().await?;
    let limit = q.limit.unwrap_or_else(|| state.engine.keyword_limit());

    let mut session = AnalyticsSession::new(state.engine.clone(), docs);
    let keywords = session.get_keywords(limit);
    let (docs, index) = session.into_parts();
    let total_articles = docs.len();
    if let (Some(id), Some(index)) = (session_id(&headers), index) {
        state.sessions.put(&id, docs, index);
    }

    Ok(ok(KeywordsData {
        keywords,
        total_articles,
        analysis_time: chrono::Local::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
struct KeywordArticles {
    keyword: String,
    total: usize,
    articles: Vec<Document>,
}

async fn keyword_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(term): Path<String>,
) -> ApiResult<KeywordArticles> {
    hit("/api/analytics/keywords/{term}/documents");
    let session = session_id(&headers)
        .and_then(|id| state.sessions.session(&id, state.engine.clone()))
        .unwrap_or_else(|| AnalyticsSession::new(state.engine.clone(), DocumentSet::new()));
    let articles = session.get_documents_for_keyword(&term);
    Ok(ok(KeywordArticles {
        keyword: term,
        total: articles.len(),
        articles,
    }))
}

async fn trends(State(state): State<AppState>) -> ApiResult<Vec<VendorTrend>> {
    hit("/api/analytics/trends");
    let docs = state.load().await?;
    Ok(ok(vendor_trends(&docs)))
}

#[derive(Debug, Deserialize)]
struct NewsQuery {
    page: Option<usize>,
    per_page: Option<usize>,
    search: Option<String>,
    vendor: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewsFilters {
    search: String,
    vendor: String,
}

#[derive(Debug, Serialize)]
struct NewsPage {
    articles: Vec<Document>,
    pagination: Pagination,
    /// Every vendor in the snapshot, sorted.
    vendors: Vec<String>,
    /// Per-vendor counts of the filtered result.
    vendor_stats: BTreeMap<String, usize>,
    timestamp: String,
    filters: NewsFilters,
}

async fn news(State(state): State<AppState>, Query(q): Query<NewsQuery>) -> ApiResult<NewsPage> {
    hit("/api/news");
    let docs = state.load().await?;

    let mut hits: Vec<&Document> = filter_documents(&docs, q.search.as_deref(), q.vendor.as_deref());
    // newest first, then by rank
    hits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.rank.cmp(&b.rank)));

    let mut vendor_stats = BTreeMap::new();
    for d in &hits {
        *vendor_stats.entry(d.source_display_name.clone()).or_insert(0) += 1;
    }
    let vendors: Vec<String> = news_stats(&docs).vendor_stats.into_keys().collect();

    let (page, pagination) = paginate(
        &hits,
        q.page.unwrap_or(1),
        q.per_page.unwrap_or(DEFAULT_PER_PAGE),
    );

    Ok(ok(NewsPage {
        articles: page.into_iter().cloned().collect(),
        pagination,
        vendors,
        vendor_stats,
        timestamp: chrono::Local::now().to_rfc3339(),
        filters: NewsFilters {
            search: q.search.unwrap_or_default(),
            vendor: q.vendor.unwrap_or_default(),
        },
    }))
}

async fn news_by_keyword(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> ApiResult<KeywordArticles> {
    hit("/api/news/by-keyword/{keyword}");
    let docs = state.load().await?;
    let mut articles: Vec<Document> = filter_documents(&docs, Some(&keyword), None)
        .into_iter()
        .cloned()
        .collect();
    articles.sort_by_key(|d| d.rank);
    info!(target: "api", keyword = %keyword, hits = articles.len(), "keyword search");
    Ok(ok(KeywordArticles {
        keyword,
        total: articles.len(),
        articles,
    }))
}

#[derive(Debug, Serialize)]
struct StatsData {
    #[serde(flatten)]
    stats: NewsStats,
    last_updated: String,
}

async fn stats(State(state): State<AppState>) -> ApiResult<StatsData> {
    hit("/api/stats");
    let docs = state.load().await?;
    Ok(ok(StatsData {
        stats: news_stats(&docs),
        last_updated: chrono::Local::now().to_rfc3339(),
    }))
}
