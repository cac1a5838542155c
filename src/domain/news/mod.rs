//! News domain — business headlines mentioning a set of symbols.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder the backend substitutes for a blank description.
pub const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub image_url: Option<String>,
}

impl NewsArticle {
    pub fn has_description(&self) -> bool {
        !self.description.is_empty() && self.description != NO_DESCRIPTION
    }
}

impl From<wire::NewsArticleResponse> for NewsArticle {
    fn from(a: wire::NewsArticleResponse) -> Self {
        Self {
            title: a.title,
            link: a.link,
            description: a.description.trim().to_string(),
            published_at: a.pub_date,
            source: a.source,
            image_url: a.image_url.filter(|u| !u.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_article_conversion() {
        let raw: Vec<wire::NewsArticleResponse> = serde_json::from_str(
            r#"[{"title":"Apple beats estimates","link":"https://news.example/a","description":"  Strong quarter. ","pubDate":"2025-01-30T21:15:00","source":"reuters","image_url":null},
                {"title":"Tesla recall","link":"https://news.example/b","pubDate":"2025-01-30 08:00:00"}]"#,
        )
        .unwrap();
        let articles: Vec<NewsArticle> = raw.into_iter().map(NewsArticle::from).collect();

        assert_eq!(articles[0].description, "Strong quarter.");
        assert!(articles[0].has_description());
        assert_eq!(articles[0].published_at.hour(), 21);
        assert_eq!(articles[0].image_url, None);

        assert_eq!(articles[1].description, NO_DESCRIPTION);
        assert!(!articles[1].has_description());
        assert_eq!(articles[1].source, "Unknown");
    }
}
