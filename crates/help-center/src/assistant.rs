/// The help-center assistant: canned answers first, then keyword matching.
use help_common::api::ChatResponse;
use tracing::debug;

use crate::canned::match_canned;
use crate::compose::compose_response;
use crate::knowledge::KnowledgeRecord;
use crate::search::find_relevant_articles;

/// Answer a normalized, non-empty query.
pub fn answer(query: &str, records: &[KnowledgeRecord]) -> ChatResponse {
    if let Some(canned) = match_canned(query) {
        debug!(query, "canned answer");
        return canned.to_response();
    }

    let matches = find_relevant_articles(query, records);
    debug!(
        query,
        matches = matches.len(),
        best_score = matches.first().map(|m| m.score).unwrap_or(0),
        "scored knowledge base"
    );
    compose_response(&matches)
}
