//! Attachment lookups used to resolve featured images.
//!
//! WordPress stores media as `attachment` items next to the posts that use
//! them. [`AttachmentIndex`] is built in one pass over a channel and maps
//! attachment IDs to URLs, and parent post IDs to the URLs of the attachments
//! uploaded to them, in document order.

use std::collections::HashMap;

use crate::document::{Channel, Item};
use crate::meta::meta_value;

/// Post type WordPress uses for media items.
pub const ATTACHMENT_POST_TYPE: &str = "attachment";

/// Attachment URL mappings built once per parse and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentIndex {
    urls_by_id: HashMap<i64, String>,
    urls_by_parent: HashMap<i64, Vec<String>>,
}

impl AttachmentIndex {
    /// Builds the index from every `attachment` item of a channel.
    ///
    /// Attachments whose URL cannot be resolved are left out of both maps.
    /// Attachments with a parent ID greater than zero are also listed under
    /// that parent, preserving document order.
    pub fn build(channel: &Channel) -> Self {
        let mut index = Self::default();
        let base_uploads_url = uploads_base_url(channel);

        for item in channel.items.iter().filter(|item| item.post_type == ATTACHMENT_POST_TYPE) {
            let Some(url) = resolve_attachment_url(item, base_uploads_url.as_deref()) else {
                continue;
            };

            if item.post_parent > 0 {
                index.urls_by_parent.entry(item.post_parent).or_default().push(url.clone());
            }
            index.urls_by_id.insert(item.post_id, url);
        }

        index
    }

    /// URL of the attachment with the given ID.
    pub fn url_for_id(&self, id: i64) -> Option<&str> {
        self.urls_by_id.get(&id).map(String::as_str)
    }

    /// URLs of all attachments uploaded to the given parent post, in document order.
    pub fn urls_for_parent(&self, parent_id: i64) -> &[String] {
        self.urls_by_parent.get(&parent_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// URL of the first attachment uploaded to the given parent post.
    pub fn first_for_parent(&self, parent_id: i64) -> Option<&str> {
        self.urls_for_parent(parent_id).first().map(String::as_str)
    }

    /// Number of attachments with a resolved URL.
    pub fn len(&self) -> usize {
        self.urls_by_id.len()
    }

    /// Check if no attachment URL was resolved
    pub fn is_empty(&self) -> bool {
        self.urls_by_id.is_empty()
    }
}

/// Resolve the URL of an attachment item.
///
/// Sources, in order:
/// 1. `wp:attachment_url`
/// 2. `<link>`
/// 3. `<guid>`
/// 4. `{base}/wp-content/uploads/{path}` from the `_wp_attached_file` meta value
pub fn resolve_attachment_url(item: &Item, base_uploads_url: Option<&str>) -> Option<String> {
    for candidate in [&item.attachment_url, &item.link, &item.guid] {
        let url = candidate.trim();
        if !url.is_empty() {
            return Some(url.to_string());
        }
    }

    let relative = meta_value(&item.meta, &["_wp_attached_file"])?;
    let base = base_uploads_url?;
    Some(format!("{}/wp-content/uploads/{}", base, relative.strip_prefix('/').unwrap_or(relative)))
}

/// Base URL for uploaded files: the first non-blank of `wp:base_site_url`,
/// `wp:base_blog_url` and the channel link, without trailing slashes.
pub fn uploads_base_url(channel: &Channel) -> Option<String> {
    [&channel.base_site_url, &channel.base_blog_url, &channel.link]
        .into_iter()
        .map(|candidate| candidate.trim())
        .find(|candidate| !candidate.is_empty())
        .map(|candidate| candidate.trim_end_matches('/').to_string())
}
