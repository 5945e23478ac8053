/// Knowledge base for the help-center assistant.
///
/// Articles are flattened into `KnowledgeRecord`s carrying a precomputed
/// lowercase search blob (title, note and steps joined by spaces). A
/// `KnowledgeBase` is an immutable snapshot of one loaded dataset: the parsed
/// document, its records in collection order, and a SHA-256 fingerprint of the
/// raw JSON used to namespace cached replies.
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::model::{Article, HelpCenterData, Topic};

/// An article prepared for keyword matching.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeRecord {
    pub article: Article,
    /// Lowercase `title note steps...`
    pub searchable_content: String,
}

impl From<&Article> for KnowledgeRecord {
    fn from(article: &Article) -> Self {
        Self {
            article: article.clone(),
            searchable_content: searchable_content(article),
        }
    }
}

/// Flatten the article collection into searchable records, preserving order.
pub fn build_knowledge_base(data: &HelpCenterData) -> Vec<KnowledgeRecord> {
    data.articles.iter().map(KnowledgeRecord::from).collect()
}

fn searchable_content(article: &Article) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(article.steps.len() + 2);
    parts.push(&article.title);
    parts.push(&article.note);
    parts.extend(article.steps.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// Hex SHA-256 of the raw dataset.
pub fn fingerprint(raw: &str) -> String {
    let hash = Sha256::digest(raw.as_bytes());
    format!("{:x}", hash)
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    data: HelpCenterData,
    records: Vec<KnowledgeRecord>,
    fingerprint: String,
}

impl KnowledgeBase {
    /// Parse a raw help-center document and build its records.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let data: HelpCenterData = serde_json::from_str(raw)?;
        Ok(Self::new(data, fingerprint(raw)))
    }

    pub fn new(data: HelpCenterData, fingerprint: String) -> Self {
        let records = build_knowledge_base(&data);
        Self {
            data,
            records,
            fingerprint,
        }
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn article_count(&self) -> usize {
        self.data.articles.len()
    }

    /// Case-insensitive lookup by id. The first article wins on duplicate ids.
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.data
            .articles
            .iter()
            .find(|a| a.id.eq_ignore_ascii_case(id))
    }

    pub fn topics(&self) -> &[Topic] {
        &self.data.topics
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.data.topics.iter().find(|t| t.id.eq_ignore_ascii_case(id))
    }

    /// Articles of a topic in declared order; dangling ids are skipped.
    pub fn topic_articles(&self, topic: &Topic) -> Vec<&Article> {
        topic
            .article_ids
            .iter()
            .filter_map(|id| self.article(id))
            .collect()
    }

    /// Popular articles in declared order; dangling ids are skipped.
    pub fn popular_articles(&self) -> Vec<&Article> {
        self.data
            .popular_articles
            .iter()
            .filter_map(|id| self.article(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, title: &str, note: &str, steps: &[&str]) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            note: note.to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
            related_links: Vec::new(),
        }
    }

    #[test]
    fn searchable_content_is_lowercase_concatenation() {
        let a = article("p", "Publish A Video", "Share It", &["Tap Post", "Done"]);
        let record = KnowledgeRecord::from(&a);
        assert_eq!(record.searchable_content, "publish a video share it tap post done");
        assert_eq!(record.article.title, "Publish A Video");
    }

    #[test]
    fn empty_fields_still_build_a_record() {
        let record = KnowledgeRecord::from(&Article::default());
        assert_eq!(record.searchable_content, " ");
        assert!(record.article.steps.is_empty());
    }

    #[test]
    fn build_is_deterministic_and_ordered() {
        let data = HelpCenterData {
            articles: vec![
                article("b", "Second", "", &[]),
                article("a", "First", "", &[]),
            ],
            ..Default::default()
        };
        let first = build_knowledge_base(&data);
        let second = build_knowledge_base(&data);
        assert_eq!(first, second);
        assert_eq!(first[0].article.id, "b");
        assert_eq!(first[1].article.id, "a");
    }

    #[test]
    fn fingerprint_tracks_content() {
        assert_eq!(fingerprint("{}"), fingerprint("{}"));
        assert_ne!(fingerprint("{}"), fingerprint("{ }"));
        assert_eq!(fingerprint("{}").len(), 64);
    }

    #[test]
    fn lookups_are_case_insensitive_and_skip_dangling_ids() {
        let raw = r#"{
            "articles": [{"id":"reset-password","title":"Reset your password"}],
            "topics": [{"id":"account","title":"Account","articleIds":["reset-password","gone"]}],
            "popularArticles": ["gone","RESET-PASSWORD"]
        }"#;
        let kb = KnowledgeBase::from_json(raw).unwrap();
        assert_eq!(kb.article_count(), 1);
        assert!(kb.article("Reset-Password").is_some());
        assert!(kb.article("missing").is_none());

        let topic = kb.topic("ACCOUNT").unwrap();
        let articles = kb.topic_articles(topic);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, "reset-password");

        let popular = kb.popular_articles();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].title, "Reset your password");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = KnowledgeBase::from_json("not json").unwrap_err();
        assert!(matches!(err, AppError::DatasetParse(_)));
    }
}
