//! Post output type.
//!
//! A [`Post`] is the normalized form of one WordPress post: every field is
//! resolved, trimmed where appropriate and ready to hand to an application.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A WordPress post extracted from a WXR export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// WordPress post ID, always greater than zero for extracted posts.
    pub id: i64,

    /// Post title; may contain HTML.
    pub title_rendered: String,

    /// Full post body as HTML.
    pub content_rendered: String,

    pub slug: String,

    /// Canonical permalink.
    pub link: String,

    pub excerpt: String,

    /// Author name, see [`AuthorExtractor`](crate::extract::AuthorExtractor).
    pub author: String,

    pub categories: Vec<String>,

    pub tags: Vec<String>,

    /// Publication date in RFC 3339, or the raw value when it could not be parsed.
    pub date: String,

    /// Last modification date in RFC 3339, or the raw value when it could not be parsed.
    pub modified_date: String,

    /// Featured image URL, empty when none was found.
    pub featured_image: String,

    pub guid: String,

    /// Parent post ID, `0` for top-level posts.
    pub parent_id: i64,

    /// All post meta entries keyed by trimmed meta key.
    pub meta: BTreeMap<String, String>,
}

impl Post {
    /// Converts the post to a JSON value.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Check if the post has a way to be addressed, either a link or a slug
    pub fn is_addressable(&self) -> bool {
        !self.link.is_empty() || !self.slug.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            id: 123,
            title_rendered: "Hello".to_string(),
            slug: "hello".to_string(),
            categories: vec!["News".to_string()],
            meta: BTreeMap::from([("views".to_string(), "10".to_string())]),
            ..Default::default()
        }
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json().unwrap();
        assert_eq!(json["id"], 123);
        assert_eq!(json["title_rendered"], "Hello");
        assert_eq!(json["categories"][0], "News");
        assert_eq!(json["tags"], serde_json::json!([]));
        assert_eq!(json["meta"]["views"], "10");
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let post: Post = serde_json::from_str(r#"{"id": 7, "slug": "seven"}"#).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.slug, "seven");
        assert!(post.meta.is_empty());
        assert!(post.categories.is_empty());
    }

    #[test]
    fn test_is_addressable() {
        let mut post = sample();
        assert!(post.is_addressable());
        post.slug.clear();
        assert!(!post.is_addressable());
        post.link = "https://example.com/hello/".to_string();
        assert!(post.is_addressable());
    }
}
