/// Redis cache for assistant replies and search results.
///
/// Reads return `Option<T>` and degrade to a miss, so callers fall through to
/// computing from the in-memory knowledge base.
///
/// Keys are namespaced by the dataset fingerprint so a reload never serves
/// replies built from the previous dataset:
/// - `phc:v1:{fingerprint}:chat:{sha256(query)}`: JSON `ChatResponse`
/// - `phc:v1:{fingerprint}:search:{sha256(query|limit)}`: JSON `Vec<ArticleSearchResult>`
use sha2::{Digest, Sha256};
use tracing::warn;

use help_common::api::{ArticleSearchResult, ChatResponse};
use help_common::redis::RedisCache;

const KEY_PREFIX: &str = "phc:v1:";

pub struct ReplyCache {
    redis: RedisCache,
    ttl_secs: u64,
}

impl ReplyCache {
    pub fn new(redis: RedisCache, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    pub fn redis(&self) -> &RedisCache {
        &self.redis
    }

    // --- Chat replies ---

    pub async fn get_chat(&self, fingerprint: &str, query: &str) -> Option<ChatResponse> {
        let key = chat_key(fingerprint, query);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_chat(&self, fingerprint: &str, query: &str, reply: &ChatResponse) {
        let key = chat_key(fingerprint, query);
        if let Ok(json) = serde_json::to_string(reply) {
            self.redis.set_with_ttl(&key, &json, self.ttl_secs).await;
        }
    }

    // --- Search results ---

    pub async fn get_search(
        &self,
        fingerprint: &str,
        query: &str,
        limit: usize,
    ) -> Option<Vec<ArticleSearchResult>> {
        let key = search_key(fingerprint, query, limit);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_search(
        &self,
        fingerprint: &str,
        query: &str,
        limit: usize,
        results: &[ArticleSearchResult],
    ) {
        let key = search_key(fingerprint, query, limit);
        if let Ok(json) = serde_json::to_string(results) {
            self.redis.set_with_ttl(&key, &json, self.ttl_secs).await;
        }
    }

    // --- Invalidation ---

    /// Drop every entry built from the dataset with `fingerprint`.
    pub async fn invalidate(&self, fingerprint: &str) {
        self.redis.delete_by_prefix(&namespace(fingerprint)).await;
    }
}

fn namespace(fingerprint: &str) -> String {
    format!("{KEY_PREFIX}{fingerprint}:")
}

fn chat_key(fingerprint: &str, query: &str) -> String {
    let hash = Sha256::digest(query.as_bytes());
    format!("{}chat:{:x}", namespace(fingerprint), hash)
}

fn search_key(fingerprint: &str, query: &str, limit: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update(b"|");
    hasher.update(limit.to_string().as_bytes());
    let hash = hasher.finalize();
    format!("{}search:{:x}", namespace(fingerprint), hash)
}
