use serde::{Deserialize, Serialize};

/// A help-center article, e.g. "Publish a video".
///
/// Every field defaults to empty so a partially filled entry in the dataset is
/// still loaded rather than rejecting the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    /// Stable slug, e.g. "publish-video"
    pub id: String,
    pub title: String,
    /// Free-text explanation shown above the steps
    pub note: String,
    /// Ordered walkthrough steps
    pub steps: Vec<String>,
    pub related_links: Vec<RelatedLink>,
}

/// A link from one article to another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedLink {
    pub id: String,
    pub title: String,
}

/// A named group of articles, e.g. "Privacy and safety".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub article_ids: Vec<String>,
}

/// The whole help-center document as shipped with the site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelpCenterData {
    pub articles: Vec<Article>,
    pub topics: Vec<Topic>,
    /// Article ids featured on the help-center landing page, in display order
    pub popular_articles: Vec<String>,
}
