// src/article.rs
//! News article records as consumed by the relevance filter and lead scorer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient::{string_field, string_or_empty};

/// One news article. Deserialization never fails on field shape: any JSON
/// value becomes an `Article` with empty / absent fields where data is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Article {
    pub title: String,
    pub description: String,
    #[serde(rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    pub source_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_pub_date(mut self, pub_date: impl Into<String>) -> Self {
        self.pub_date = Some(pub_date.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_name = source.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Boundary validation: `source_name` falls back to `source_id`.
    pub fn from_value(v: &Value) -> Self {
        Self {
            title: string_or_empty(v, &["title"]),
            description: string_or_empty(v, &["description"]),
            pub_date: string_field(v, &["pubDate", "pub_date"]),
            source_name: string_or_empty(v, &["source_name", "source_id"]),
            link: string_field(v, &["link", "url"]),
        }
    }

    /// Lowercase `"title description"` blob used for keyword matching.
    pub fn text_blob(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

impl From<Value> for Article {
    fn from(v: Value) -> Self {
        Self::from_value(&v)
    }
}

/// An article plus its relevance score. Serialized flat, like the input record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    pub relevance_score: u8,
}
