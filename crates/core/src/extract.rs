//! Field extractors that turn a raw [`Item`] into [`Post`](crate::Post) fields.
//!
//! Each field has its own resolver with a fixed fallback order. The
//! pluggable ones implement [`ItemExtractor`] or, when they need the
//! attachment index, [`ImageExtractor`]; closures implement both traits, so a
//! caller can override a single rule without reimplementing the rest.
//!
//! # Example
//!
//! ```rust
//! use wxr_core::WxrParser;
//! use wxr_core::document::Item;
//!
//! let parser = WxrParser::builder()
//!     .author_extractor(|item: &Item| item.creator.to_uppercase())
//!     .build();
//! ```

use std::collections::BTreeMap;

use crate::attachments::AttachmentIndex;
use crate::date::normalize_date;
use crate::document::Item;
use crate::meta::meta_value;

/// Resolves one text field of a post from its source item.
pub trait ItemExtractor: Send + Sync {
    fn extract(&self, item: &Item) -> String;
}

impl<F> ItemExtractor for F
where
    F: Fn(&Item) -> String + Send + Sync,
{
    fn extract(&self, item: &Item) -> String {
        self(item)
    }
}

/// Resolves a field that needs the attachment index, such as the featured image.
pub trait ImageExtractor: Send + Sync {
    fn extract(&self, item: &Item, attachments: &AttachmentIndex) -> String;
}

impl<F> ImageExtractor for F
where
    F: Fn(&Item, &AttachmentIndex) -> String + Send + Sync,
{
    fn extract(&self, item: &Item, attachments: &AttachmentIndex) -> String {
        self(item, attachments)
    }
}

/// Author name with priority fallback:
/// 1. Meta `redator`, `autor`, `author_name` (configurable)
/// 2. `dc:creator`
///
/// The result is trimmed.
#[derive(Debug, Clone)]
pub struct AuthorExtractor {
    pub meta_keys: Vec<String>,
}

impl Default for AuthorExtractor {
    fn default() -> Self {
        Self { meta_keys: vec!["redator".to_string(), "autor".to_string(), "author_name".to_string()] }
    }
}

impl ItemExtractor for AuthorExtractor {
    fn extract(&self, item: &Item) -> String {
        meta_value(&item.meta, &self.meta_keys)
            .unwrap_or(&item.creator)
            .trim()
            .to_string()
    }
}

/// Excerpt with priority fallback:
/// 1. `excerpt:encoded`, returned as written when it is not blank
/// 2. Meta `subtitulo` (configurable)
#[derive(Debug, Clone)]
pub struct ExcerptExtractor {
    pub meta_keys: Vec<String>,
}

impl Default for ExcerptExtractor {
    fn default() -> Self {
        Self { meta_keys: vec!["subtitulo".to_string()] }
    }
}

impl ItemExtractor for ExcerptExtractor {
    fn extract(&self, item: &Item) -> String {
        if !item.excerpt_encoded.trim().is_empty() {
            return item.excerpt_encoded.clone();
        }

        meta_value(&item.meta, &self.meta_keys).unwrap_or_default().to_string()
    }
}

/// Publication date with priority fallback, normalized to RFC 3339:
/// 1. `wp:post_date_gmt`
/// 2. `wp:post_date`
/// 3. `<pubDate>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateExtractor;

impl ItemExtractor for DateExtractor {
    fn extract(&self, item: &Item) -> String {
        first_date(&[&item.post_date_gmt, &item.post_date, &item.pub_date])
    }
}

/// Modification date with priority fallback, normalized to RFC 3339:
/// 1. `wp:post_modified_gmt`
/// 2. `wp:post_modified`
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedDateExtractor;

impl ItemExtractor for ModifiedDateExtractor {
    fn extract(&self, item: &Item) -> String {
        first_date(&[&item.post_modified_gmt, &item.post_modified])
    }
}

/// Normalize the first non-empty candidate; empty stays empty
fn first_date(candidates: &[&String]) -> String {
    candidates
        .iter()
        .find(|candidate| !candidate.is_empty())
        .map(|candidate| normalize_date(candidate))
        .unwrap_or_default()
}

/// Featured image URL with priority fallback:
/// 1. Meta `banner_da_materia`, `banner_old`, `link_do_banner` (configurable)
/// 2. Meta `_thumbnail_id` looked up in the attachment index by ID
/// 3. First attachment uploaded to this post
///
/// A `_thumbnail_id` that is not an integer, or that names an unknown
/// attachment, falls through to the next rule.
#[derive(Debug, Clone)]
pub struct FeaturedImageExtractor {
    pub meta_keys: Vec<String>,
}

impl Default for FeaturedImageExtractor {
    fn default() -> Self {
        Self {
            meta_keys: vec!["banner_da_materia".to_string(), "banner_old".to_string(), "link_do_banner".to_string()],
        }
    }
}

impl ImageExtractor for FeaturedImageExtractor {
    fn extract(&self, item: &Item, attachments: &AttachmentIndex) -> String {
        if let Some(url) = meta_value(&item.meta, &self.meta_keys) {
            return url.to_string();
        }

        if let Some(thumbnail_id) = meta_value(&item.meta, &["_thumbnail_id"])
            && let Ok(id) = thumbnail_id.parse::<i64>()
            && let Some(url) = attachments.url_for_id(id)
        {
            return url.to_string();
        }

        attachments.first_for_parent(item.post_id).unwrap_or_default().to_string()
    }
}

/// Category and tag names from `<category>` entries, in document order.
///
/// Entries with `domain="category"` or no domain are categories,
/// `domain="post_tag"` are tags. Names are trimmed; blank names are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryExtractor;

impl CategoryExtractor {
    pub fn categories(&self, item: &Item) -> Vec<String> {
        Self::names_in(item, |domain| domain.is_empty() || domain == "category")
    }

    pub fn tags(&self, item: &Item) -> Vec<String> {
        Self::names_in(item, |domain| domain == "post_tag")
    }

    fn names_in(item: &Item, domain_matches: impl Fn(&str) -> bool) -> Vec<String> {
        item.categories
            .iter()
            .filter(|category| domain_matches(&category.domain.trim().to_lowercase()))
            .map(|category| category.value.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// All `wp:postmeta` entries as a map.
///
/// Keys are trimmed and entries with a blank key are skipped. Values are kept
/// as written; when a key repeats, the last value wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaExtractor;

impl MetaExtractor {
    pub fn extract(&self, item: &Item) -> BTreeMap<String, String> {
        item.meta
            .iter()
            .filter(|entry| !entry.key.trim().is_empty())
            .map(|entry| (entry.key.trim().to_string(), entry.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Category, Channel, MetaEntry};

    fn item_with_meta(pairs: &[(&str, &str)]) -> Item {
        Item { meta: pairs.iter().map(|(k, v)| MetaEntry::new(*k, *v)).collect(), ..Default::default() }
    }

    fn attachment(id: i64, parent: i64, url: &str) -> Item {
        Item {
            post_id: id,
            post_parent: parent,
            post_type: "attachment".to_string(),
            attachment_url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_author_from_meta_priority() {
        let mut item = item_with_meta(&[("author_name", "Third"), ("autor", " Second "), ("redator", "null")]);
        item.creator = "Creator".to_string();
        assert_eq!(AuthorExtractor::default().extract(&item), "Second");
    }

    #[test]
    fn test_author_falls_back_to_creator_trimmed() {
        let mut item = item_with_meta(&[("redator", "  ")]);
        item.creator = "  John Doe \n".to_string();
        assert_eq!(AuthorExtractor::default().extract(&item), "John Doe");
    }

    #[test]
    fn test_author_custom_keys() {
        let item = item_with_meta(&[("byline", "Ana"), ("redator", "Maria")]);
        let extractor = AuthorExtractor { meta_keys: vec!["byline".to_string()] };
        assert_eq!(extractor.extract(&item), "Ana");
    }

    #[test]
    fn test_excerpt_kept_untrimmed() {
        let mut item = item_with_meta(&[("subtitulo", "Resumo")]);
        item.excerpt_encoded = "  Lead paragraph \n".to_string();
        assert_eq!(ExcerptExtractor::default().extract(&item), "  Lead paragraph \n");
    }

    #[test]
    fn test_excerpt_falls_back_to_subtitle() {
        let mut item = item_with_meta(&[("subtitulo", " Resumo curto ")]);
        item.excerpt_encoded = " \n ".to_string();
        assert_eq!(ExcerptExtractor::default().extract(&item), "Resumo curto");
    }

    #[test]
    fn test_excerpt_empty_when_nothing_found() {
        assert_eq!(ExcerptExtractor::default().extract(&Item::default()), "");
    }

    #[test]
    fn test_date_priority() {
        let mut item = Item {
            post_date: "2025-06-01 11:00:51".to_string(),
            pub_date: "Sun, 01 Jun 2025 14:00:51 +0000".to_string(),
            ..Default::default()
        };
        assert_eq!(DateExtractor.extract(&item), "2025-06-01T11:00:51Z");

        item.post_date_gmt = "2025-06-01 14:00:51".to_string();
        assert_eq!(DateExtractor.extract(&item), "2025-06-01T14:00:51Z");

        item.post_date_gmt.clear();
        item.post_date.clear();
        assert_eq!(DateExtractor.extract(&item), "2025-06-01T14:00:51Z");

        item.pub_date.clear();
        assert_eq!(DateExtractor.extract(&item), "");
    }

    #[test]
    fn test_unparseable_date_kept() {
        let item = Item { post_date_gmt: "0000-00-00 00:00:00".to_string(), ..Default::default() };
        assert_eq!(DateExtractor.extract(&item), "0000-00-00 00:00:00");
    }

    #[test]
    fn test_modified_date_priority() {
        let mut item = Item { post_modified: "2025-01-15 14:30:00".to_string(), ..Default::default() };
        assert_eq!(ModifiedDateExtractor.extract(&item), "2025-01-15T14:30:00Z");

        item.post_modified_gmt = "2025-01-15 17:30:00".to_string();
        assert_eq!(ModifiedDateExtractor.extract(&item), "2025-01-15T17:30:00Z");
    }

    #[test]
    fn test_featured_image_priority() {
        let channel = Channel {
            items: vec![attachment(555, 0, "https://cdn/thumb.png"), attachment(600, 42, "https://cdn/first.png")],
            ..Default::default()
        };
        let index = AttachmentIndex::build(&channel);
        let extractor = FeaturedImageExtractor::default();

        let mut item = item_with_meta(&[("_thumbnail_id", "555"), ("banner_old", "https://img/banner.png")]);
        item.post_id = 42;
        assert_eq!(extractor.extract(&item, &index), "https://img/banner.png");

        item.meta.retain(|entry| entry.key != "banner_old");
        assert_eq!(extractor.extract(&item, &index), "https://cdn/thumb.png");

        item.meta.clear();
        assert_eq!(extractor.extract(&item, &index), "https://cdn/first.png");

        item.post_id = 7;
        assert_eq!(extractor.extract(&item, &index), "");
    }

    #[test]
    fn test_featured_image_bad_thumbnail_falls_through() {
        let channel = Channel { items: vec![attachment(600, 42, "https://cdn/first.png")], ..Default::default() };
        let index = AttachmentIndex::build(&channel);
        let extractor = FeaturedImageExtractor::default();

        let mut item = item_with_meta(&[("_thumbnail_id", "not-a-number")]);
        item.post_id = 42;
        assert_eq!(extractor.extract(&item, &index), "https://cdn/first.png");

        item.meta = vec![MetaEntry::new("_thumbnail_id", "999")];
        assert_eq!(extractor.extract(&item, &index), "https://cdn/first.png");
    }

    #[test]
    fn test_categories_and_tags() {
        let category = |domain: &str, value: &str| Category {
            domain: domain.to_string(),
            nicename: String::new(),
            value: value.to_string(),
        };
        let item = Item {
            categories: vec![
                category("category", " Technology "),
                category("post_tag", "Go"),
                category("", "Uncategorized"),
                category(" Category ", "News"),
                category("POST_TAG", "Rust"),
                category("category", "   "),
                category("nav_menu", "Main Menu"),
            ],
            ..Default::default()
        };

        assert_eq!(CategoryExtractor.categories(&item), vec!["Technology", "Uncategorized", "News"]);
        assert_eq!(CategoryExtractor.tags(&item), vec!["Go", "Rust"]);
        assert!(CategoryExtractor.tags(&Item::default()).is_empty());
    }

    #[test]
    fn test_meta_map() {
        let item = item_with_meta(&[("custom_field", "one"), (" custom_field ", "two"), ("", "dropped"), ("x", " v ")]);
        let meta = MetaExtractor.extract(&item);
        assert_eq!(meta.len(), 2);
        assert_eq!(meta["custom_field"], "two");
        assert_eq!(meta["x"], " v ");
    }

    #[test]
    fn test_closures_are_extractors() {
        let upper = |item: &Item| item.title.to_uppercase();
        let item = Item { title: "hello".to_string(), ..Default::default() };
        assert_eq!(ItemExtractor::extract(&upper, &item), "HELLO");

        let none = |_: &Item, _: &AttachmentIndex| String::from("none");
        assert_eq!(ImageExtractor::extract(&none, &item, &AttachmentIndex::default()), "none");
    }
}
