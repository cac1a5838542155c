//! Wire type for `GET /trading/api/news`.

use crate::shared::serde_util::flexible_timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;

fn default_description() -> String {
    super::NO_DESCRIPTION.to_string()
}

fn default_source() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsArticleResponse {
    pub title: String,
    pub link: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(rename = "pubDate", deserialize_with = "flexible_timestamp::deserialize")]
    pub pub_date: DateTime<Utc>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub image_url: Option<String>,
}
