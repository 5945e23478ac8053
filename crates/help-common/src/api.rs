//! Wire types for the help-center HTTP API. Field names follow the site's
//! camelCase JSON convention.
use serde::{Deserialize, Serialize};

/// Body of `POST /api/ai-chat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Prior turns sent by the widget. Accepted in any shape, never read.
    #[serde(default)]
    pub conversation_history: serde_json::Value,
}

impl ChatRequest {
    /// Number of prior turns, or 0 when the history is not an array.
    pub fn history_len(&self) -> usize {
        self.conversation_history.as_array().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    /// The assistant could not answer and the user should reach human support.
    pub needs_contact: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Maximum number of results (default: 10, max: 50).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSearchResult {
    pub id: String,
    pub title: String,
    pub score: u32,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ArticleSearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedLink {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetailResponse {
    pub id: String,
    pub title: String,
    pub note: String,
    pub steps: Vec<String>,
    pub related_links: Vec<RelatedLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub article_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicListResponse {
    pub topics: Vec<TopicInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDetailResponse {
    pub topic: TopicInfo,
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularArticlesResponse {
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub reloaded: bool,
    pub fingerprint: String,
    pub article_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub article_count: usize,
    pub fingerprint: String,
    pub redis_available: bool,
}
