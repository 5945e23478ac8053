/// Keyword relevance scoring over knowledge records.
///
/// A bag-of-substrings heuristic: every query token found in the title is worth
/// 3, every token found anywhere in the searchable content is worth 1, and the
/// full query earns a phrase bonus of 10 in the title and 5 in the content.
/// There is no stemming and no IDF weighting.
use crate::knowledge::KnowledgeRecord;

/// Matches the assistant uses when composing a reply.
pub const MAX_MATCHES: usize = 3;

const TITLE_TOKEN_WEIGHT: u32 = 3;
const CONTENT_TOKEN_WEIGHT: u32 = 1;
const TITLE_PHRASE_BONUS: u32 = 10;
const CONTENT_PHRASE_BONUS: u32 = 5;
const MAX_SUMMARY_LEN: usize = 300;

/// A record with its score for one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredRecord<'a> {
    pub record: &'a KnowledgeRecord,
    pub score: u32,
}

/// Lowercase and trim a raw query.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Score a normalized query against one record.
///
/// `content` must already be lowercase; `title` is lowercased here. An empty or
/// whitespace-only query scores 0 instead of collecting the phrase bonuses that
/// an empty substring would otherwise match everywhere.
pub fn relevance_score(query: &str, content: &str, title: &str) -> u32 {
    if query.trim().is_empty() {
        return 0;
    }
    let title = title.to_lowercase();

    let mut score = 0;
    for token in query.split_whitespace() {
        if title.contains(token) {
            score += TITLE_TOKEN_WEIGHT;
        }
        if content.contains(token) {
            score += CONTENT_TOKEN_WEIGHT;
        }
    }
    if title.contains(query) {
        score += TITLE_PHRASE_BONUS;
    }
    if content.contains(query) {
        score += CONTENT_PHRASE_BONUS;
    }
    score
}

/// Score every record and keep the best `limit` with a positive score.
///
/// Sorted by descending score; the sort is stable so ties keep collection order.
pub fn search_records<'a>(
    query: &str,
    records: &'a [KnowledgeRecord],
    limit: usize,
) -> Vec<ScoredRecord<'a>> {
    let mut scored: Vec<ScoredRecord<'a>> = records
        .iter()
        .map(|record| ScoredRecord {
            record,
            score: relevance_score(query, &record.searchable_content, &record.article.title),
        })
        .filter(|s| s.score > 0)
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// The top `MAX_MATCHES` records for the assistant.
pub fn find_relevant_articles<'a>(
    query: &str,
    records: &'a [KnowledgeRecord],
) -> Vec<ScoredRecord<'a>> {
    search_records(query, records, MAX_MATCHES)
}

/// Short preview of a record for search listings.
pub fn summarize(record: &KnowledgeRecord) -> String {
    let article = &record.article;
    let text = if article.note.is_empty() {
        article.steps.join(" ")
    } else {
        article.note.clone()
    };
    if text.chars().count() > MAX_SUMMARY_LEN {
        format!("{}...", text.chars().take(MAX_SUMMARY_LEN).collect::<String>())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Article;

    fn record(id: &str, title: &str, note: &str) -> KnowledgeRecord {
        KnowledgeRecord::from(&Article {
            id: id.to_string(),
            title: title.to_string(),
            note: note.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn token_and_phrase_weights() {
        // "video": title +3, content +1; "share": content +1; phrase in content +5
        let score = relevance_score("share video", "how to share video clips", "Video tips");
        assert_eq!(score, 3 + 1 + 1 + 5);
    }

    #[test]
    fn exact_title_match_includes_title_bonus() {
        let r = record("p", "Publish a Video", "");
        let score = relevance_score("publish a video", &r.searchable_content, &r.article.title);
        // tokens: publish, a, video each +3 title +1 content; title phrase +10; content phrase +5
        assert_eq!(score, 3 * 4 + 10 + 5);
        assert!(score >= TITLE_PHRASE_BONUS);
    }

    #[test]
    fn empty_and_whitespace_queries_score_zero() {
        assert_eq!(relevance_score("", "anything", "Anything"), 0);
        assert_eq!(relevance_score("   ", "anything", "Anything"), 0);
    }

    #[test]
    fn unrelated_query_scores_zero() {
        assert_eq!(relevance_score("xyzzy", "publish a video", "Publish"), 0);
    }

    #[test]
    fn score_is_deterministic() {
        let r = record("a", "Reset your password", "Forgot password? Reset it here.");
        let first = relevance_score("reset password", &r.searchable_content, &r.article.title);
        let second = relevance_score("reset password", &r.searchable_content, &r.article.title);
        assert_eq!(first, second);
    }

    #[test]
    fn returns_at_most_three_sorted_descending() {
        let records = vec![
            record("a", "Video", "video"),
            record("b", "Other", "video"),
            record("c", "Video video", "video"),
            record("d", "Nothing", "video"),
            record("e", "Unrelated", "nope"),
        ];
        let results = find_relevant_articles("video", &records);
        assert_eq!(results.len(), 3);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results.iter().all(|r| r.record.article.id != "e"));
    }

    #[test]
    fn ties_keep_collection_order() {
        let records = vec![
            record("first", "Other", "video"),
            record("second", "Other", "video"),
            record("third", "Other", "video"),
            record("fourth", "Other", "video"),
        ];
        let ids: Vec<&str> = find_relevant_articles("video", &records)
            .iter()
            .map(|r| r.record.article.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn no_keyword_hits_yield_no_results() {
        let records = vec![record("a", "Publish a video", "Tap post")];
        assert!(find_relevant_articles("xyzzy nonsense", &records).is_empty());
        assert!(find_relevant_articles("", &records).is_empty());
    }

    #[test]
    fn search_respects_limit() {
        let records: Vec<KnowledgeRecord> = (0..20)
            .map(|i| record(&format!("r{i}"), "Video", ""))
            .collect();
        assert_eq!(search_records("video", &records, 10).len(), 10);
        assert_eq!(search_records("video", &records, 50).len(), 20);
    }

    #[test]
    fn summary_falls_back_to_steps_and_truncates() {
        let mut r = record("a", "T", "");
        r.article.steps = vec!["One.".to_string(), "Two.".to_string()];
        assert_eq!(summarize(&r), "One. Two.");

        let long = "x".repeat(MAX_SUMMARY_LEN + 10);
        let r = record("b", "T", &long);
        let summary = summarize(&r);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), MAX_SUMMARY_LEN + 3);
    }
}
