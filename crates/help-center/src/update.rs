/// Loading and reloading the help-center dataset.
///
/// The knowledge base is built once per dataset and shared read-only. A reload
/// re-reads the file, compares fingerprints and swaps in a new snapshot only
/// when the content changed, then drops cache entries of the old snapshot.
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::cache::ReplyCache;
use crate::error::AppError;
use crate::knowledge::{fingerprint, KnowledgeBase};

const BUNDLED_DATASET: &str = include_str!("../data/help_center.json");

/// Where the dataset comes from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Compiled into the binary; never changes.
    Bundled,
    File(PathBuf),
}

impl DatasetSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(Self::File).unwrap_or(Self::Bundled)
    }

    pub async fn read(&self) -> Result<String, AppError> {
        match self {
            Self::Bundled => Ok(BUNDLED_DATASET.to_string()),
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| AppError::DatasetRead {
                        path: path.display().to_string(),
                        source,
                    })
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Result of a reload request.
#[derive(Debug)]
pub struct ReloadResult {
    /// Whether a new snapshot was swapped in (false if unchanged or bundled).
    pub reloaded: bool,
    pub fingerprint: String,
    pub article_count: usize,
}

pub struct ReloadService {
    source: DatasetSource,
    cache: Arc<ReplyCache>,
}

impl ReloadService {
    pub fn new(source: DatasetSource, cache: Arc<ReplyCache>) -> Self {
        Self { source, cache }
    }

    /// Read and build the initial knowledge base.
    pub async fn load(&self) -> Result<KnowledgeBase, AppError> {
        let raw = self.source.read().await?;
        let kb = KnowledgeBase::from_json(&raw)?;
        info!(
            source = %self.source.describe(),
            articles = kb.article_count(),
            topics = kb.topics().len(),
            fingerprint = %kb.fingerprint(),
            "knowledge base loaded"
        );
        Ok(kb)
    }

    /// Re-read the dataset and swap it in if its content changed.
    ///
    /// On read or parse failure the current snapshot stays active.
    pub async fn reload(&self, current: &RwLock<KnowledgeBase>) -> Result<ReloadResult, AppError> {
        if matches!(self.source, DatasetSource::Bundled) {
            let kb = current.read().await;
            info!("bundled dataset, skipping reload");
            return Ok(ReloadResult {
                reloaded: false,
                fingerprint: kb.fingerprint().to_string(),
                article_count: kb.article_count(),
            });
        }

        let raw = self.source.read().await?;
        let new_fingerprint = fingerprint(&raw);
        {
            let kb = current.read().await;
            if kb.fingerprint() == new_fingerprint {
                info!(fingerprint = %new_fingerprint, "dataset unchanged, skipping reload");
                return Ok(ReloadResult {
                    reloaded: false,
                    fingerprint: new_fingerprint,
                    article_count: kb.article_count(),
                });
            }
        }

        let data = serde_json::from_str(&raw)?;
        let fresh = KnowledgeBase::new(data, new_fingerprint.clone());
        let article_count = fresh.article_count();

        let old_fingerprint = {
            let mut kb = current.write().await;
            let old = kb.fingerprint().to_string();
            *kb = fresh;
            old
        };
        self.cache.invalidate(&old_fingerprint).await;

        info!(
            old = %old_fingerprint,
            new = %new_fingerprint,
            articles = article_count,
            "knowledge base reloaded"
        );

        Ok(ReloadResult {
            reloaded: true,
            fingerprint: new_fingerprint,
            article_count,
        })
    }
}
