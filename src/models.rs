//! Data models for scraped articles.
//!
//! This module defines the record produced by the fetching layer:
//! - [`Article`]: A normalized blog post with its URL, page title and body text
//!
//! Articles are plain data. They carry no back-references to the page they
//! were scraped from and are never mutated after the fetcher returns them.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::trends::FieldSource;

/// A normalized article scraped from a tech blog.
///
/// # Fields
///
/// * `url` - The URL the article was fetched from
/// * `title` - The trimmed page `<title>`, or the URL when the page has none
/// * `content` - Plain body text with inter-element whitespace collapsed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// The source URL of the article.
    pub url: String,
    /// The page title.
    pub title: String,
    /// The extracted body text.
    pub content: String,
}

impl Article {
    /// Extract the registrable site name from the article URL.
    /// For example: "https://engineering.mercari.com/blog/entry/x" -> "mercari"
    pub fn source_tag(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        // "qiita.com" -> "qiita", "techblog.yahoo.co.jp" -> "yahoo"
        let tld_parts = if host.ends_with(".co.jp") { 3 } else { 2 };
        if parts.len() >= tld_parts {
            Some(parts[parts.len() - tld_parts].to_string())
        } else {
            None
        }
    }
}

impl FieldSource for Article {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "url" => Some(Cow::Borrowed(self.url.as_str())),
            "title" => Some(Cow::Borrowed(self.title.as_str())),
            "content" => Some(Cow::Borrowed(self.content.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(url: &str) -> Article {
        Article {
            url: url.to_string(),
            title: "Test".to_string(),
            content: "Rust と Go".to_string(),
        }
    }

    #[test]
    fn test_article_serialization() {
        let json = serde_json::to_string(&article("https://zenn.dev/articles/abc")).unwrap();
        assert!(json.contains("\"url\":\"https://zenn.dev/articles/abc\""));
        assert!(json.contains("Rust と Go"));
    }

    #[test]
    fn test_article_deserialization() {
        let json = r#"{
            "url": "https://qiita.com/items/1",
            "title": "Pythonの基礎",
            "content": "本文"
        }"#;

        let parsed: Article = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.title, "Pythonの基礎");
        assert_eq!(parsed.content, "本文");
    }

    #[test]
    fn test_source_tag_simple_domain() {
        assert_eq!(
            article("https://qiita.com/user/items/1").source_tag(),
            Some("qiita".to_string())
        );
    }

    #[test]
    fn test_source_tag_subdomain() {
        assert_eq!(
            article("https://engineering.mercari.com/blog/entry/x").source_tag(),
            Some("mercari".to_string())
        );
    }

    #[test]
    fn test_source_tag_co_jp() {
        assert_eq!(
            article("https://techblog.yahoo.co.jp/entry/2024").source_tag(),
            Some("yahoo".to_string())
        );
    }

    #[test]
    fn test_source_tag_invalid_url() {
        assert_eq!(article("not a url").source_tag(), None);
    }

    #[test]
    fn test_field_source_known_and_unknown_fields() {
        let a = article("https://zenn.dev/articles/abc");
        assert_eq!(a.field("title").as_deref(), Some("Test"));
        assert_eq!(a.field("content").as_deref(), Some("Rust と Go"));
        assert!(a.field("published").is_none());
    }
}
