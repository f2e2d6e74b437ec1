//! Item selection.

use crate::document::Item;

/// Decides whether an item becomes a post.
pub trait Filter: Send + Sync {
    fn accept(&self, item: &Item) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&Item) -> bool + Send + Sync,
{
    fn accept(&self, item: &Item) -> bool {
        self(item)
    }
}

/// Accepts items by post type and status. An empty field accepts any value.
///
/// The default selects published posts.
///
/// # Example
///
/// ```rust
/// use wxr_core::filter::{DefaultFilter, Filter};
/// use wxr_core::document::Item;
///
/// let pages = DefaultFilter::new("page", "");
/// let item = Item { post_type: "page".into(), status: "draft".into(), ..Default::default() };
/// assert!(pages.accept(&item));
/// assert!(!DefaultFilter::default().accept(&item));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultFilter {
    pub post_type: String,
    pub status: String,
}

impl DefaultFilter {
    pub fn new(post_type: impl Into<String>, status: impl Into<String>) -> Self {
        Self { post_type: post_type.into(), status: status.into() }
    }
}

impl Default for DefaultFilter {
    fn default() -> Self {
        Self::new("post", "publish")
    }
}

impl Filter for DefaultFilter {
    fn accept(&self, item: &Item) -> bool {
        (self.post_type.is_empty() || item.post_type == self.post_type)
            && (self.status.is_empty() || item.status == self.status)
    }
}
