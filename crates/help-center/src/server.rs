/// HTTP surface of the help-center service.
///
/// - `POST /api/ai-chat`: the help-center assistant
/// - `GET /api/help/search`: keyword search over articles
/// - `GET /api/help/articles/{id}`: a single article
/// - `GET /api/help/topics`, `GET /api/help/topics/{id}`: browse by topic
/// - `GET /api/help/popular`: featured articles
/// - `POST /api/help/reload`: re-read the dataset file
/// - `GET /health`
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use help_common::api::{
    ArticleDetailResponse, ArticleSearchResult, ArticleSummary, ChatRequest, ChatResponse,
    HealthResponse, PopularArticlesResponse, RelatedLink, ReloadResponse, SearchParams,
    SearchResponse, TopicDetailResponse, TopicInfo, TopicListResponse,
};

use crate::assistant;
use crate::cache::ReplyCache;
use crate::error::{AppError, ChatError};
use crate::knowledge::KnowledgeBase;
use crate::model::{Article, Topic};
use crate::rate_limit::RateLimiter;
use crate::search::{normalize_query, search_records, summarize};
use crate::update::ReloadService;

const DEFAULT_SEARCH_LIMIT: u32 = 10;
const MAX_SEARCH_LIMIT: u32 = 50;

/// Shared state. The knowledge base is read by every request and written only
/// by a reload.
#[derive(Clone)]
pub struct AppState {
    knowledge: Arc<RwLock<KnowledgeBase>>,
    cache: Arc<ReplyCache>,
    reload: Arc<ReloadService>,
    limiter: Option<RateLimiter>,
}

impl AppState {
    pub fn new(
        knowledge: KnowledgeBase,
        cache: Arc<ReplyCache>,
        reload: ReloadService,
        limiter: Option<RateLimiter>,
    ) -> Self {
        Self {
            knowledge: Arc::new(RwLock::new(knowledge)),
            cache,
            reload: Arc::new(reload),
            limiter,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let chat = Router::new().route("/api/ai-chat", post(chat_handler));
    build_router(state, chat)
}

/// Mount `chat` behind the panic catcher, next to the browsing routes.
fn build_router(state: AppState, chat: Router<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let chat = chat.layer(CatchPanicLayer::custom(chat_panic_response));

    Router::new()
        .merge(chat)
        .route("/api/help/search", get(search_handler))
        .route("/api/help/articles/{id}", get(article_handler))
        .route("/api/help/topics", get(topics_handler))
        .route("/api/help/topics/{id}", get(topic_handler))
        .route("/api/help/popular", get(popular_handler))
        .route("/api/help/reload", post(reload_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "rejected chat body");
            return Err(ChatError::MessageRequired);
        }
    };

    let query = normalize_query(&request.message);
    if query.is_empty() {
        return Err(ChatError::MessageRequired);
    }

    if let Some(limiter) = &state.limiter {
        limiter.check().await?;
    }

    debug!(history = request.history_len(), "chat request");

    // No knowledge guard is held across cache round-trips.
    let fingerprint = state.knowledge.read().await.fingerprint().to_string();
    if let Some(cached) = state.cache.get_chat(&fingerprint, &query).await {
        debug!(query, "chat cache hit");
        return Ok(Json(cached));
    }

    let (fingerprint, reply) = {
        let kb = state.knowledge.read().await;
        (
            kb.fingerprint().to_string(),
            assistant::answer(&query, kb.records()),
        )
    };

    state.cache.set_chat(&fingerprint, &query, &reply).await;
    Ok(Json(reply))
}

/// A panic while answering still yields the chat reply shape.
fn chat_panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ChatError::Internal(format!("panic while answering: {detail}")).into_response()
}

async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let query = normalize_query(&params.q);
    if query.is_empty() {
        return Err(AppError::Validation("q must not be empty".to_string()));
    }
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT) as usize;

    let fingerprint = state.knowledge.read().await.fingerprint().to_string();
    if let Some(cached) = state.cache.get_search(&fingerprint, &query, limit).await {
        debug!(query, "search cache hit");
        return Ok(Json(SearchResponse { results: cached }));
    }

    let (fingerprint, results) = {
        let kb = state.knowledge.read().await;
        let results: Vec<ArticleSearchResult> = search_records(&query, kb.records(), limit)
            .into_iter()
            .map(|m| ArticleSearchResult {
                id: m.record.article.id.clone(),
                title: m.record.article.title.clone(),
                score: m.score,
                summary: summarize(m.record),
            })
            .collect();
        (kb.fingerprint().to_string(), results)
    };

    state
        .cache
        .set_search(&fingerprint, &query, limit, &results)
        .await;
    Ok(Json(SearchResponse { results }))
}

async fn article_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleDetailResponse>, AppError> {
    let id = id.trim();
    let kb = state.knowledge.read().await;
    let article = kb
        .article(id)
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(Json(to_api_article(article)))
}

async fn topics_handler(State(state): State<AppState>) -> Json<TopicListResponse> {
    let kb = state.knowledge.read().await;
    let topics = kb
        .topics()
        .iter()
        .map(|t| to_topic_info(&kb, t))
        .collect();
    Json(TopicListResponse { topics })
}

async fn topic_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TopicDetailResponse>, AppError> {
    let id = id.trim();
    let kb = state.knowledge.read().await;
    let topic = kb.topic(id).ok_or_else(|| {
        let available: Vec<&str> = kb.topics().iter().map(|t| t.id.as_str()).collect();
        AppError::UnknownTopic {
            id: id.to_string(),
            available: available.join(", "),
        }
    })?;

    let articles = kb
        .topic_articles(topic)
        .into_iter()
        .map(to_summary)
        .collect();
    Ok(Json(TopicDetailResponse {
        topic: to_topic_info(&kb, topic),
        articles,
    }))
}

async fn popular_handler(State(state): State<AppState>) -> Json<PopularArticlesResponse> {
    let kb = state.knowledge.read().await;
    let articles = kb.popular_articles().into_iter().map(to_summary).collect();
    Json(PopularArticlesResponse { articles })
}

async fn reload_handler(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    info!("dataset reload requested");
    let result = state.reload.reload(&state.knowledge).await?;
    Ok(Json(ReloadResponse {
        reloaded: result.reloaded,
        fingerprint: result.fingerprint,
        article_count: result.article_count,
    }))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (article_count, fingerprint) = {
        let kb = state.knowledge.read().await;
        (kb.article_count(), kb.fingerprint().to_string())
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        article_count,
        fingerprint,
        redis_available: state.cache.redis().is_available().await,
    })
}

fn to_api_article(article: &Article) -> ArticleDetailResponse {
    ArticleDetailResponse {
        id: article.id.clone(),
        title: article.title.clone(),
        note: article.note.clone(),
        steps: article.steps.clone(),
        related_links: article
            .related_links
            .iter()
            .map(|l| RelatedLink {
                id: l.id.clone(),
                title: l.title.clone(),
            })
            .collect(),
    }
}

fn to_summary(article: &Article) -> ArticleSummary {
    ArticleSummary {
        id: article.id.clone(),
        title: article.title.clone(),
    }
}

fn to_topic_info(kb: &KnowledgeBase, topic: &Topic) -> TopicInfo {
    TopicInfo {
        id: topic.id.clone(),
        title: topic.title.clone(),
        description: topic.description.clone(),
        article_count: kb.topic_articles(topic).len(),
    }
}
