//! Error types for WXR parsing.
//!
//! This module defines the main error type [`WxrError`]. Only two failures
//! ever reach a caller: a document that cannot be decoded as a WXR export,
//! and a parse that was cancelled from the outside. Every other anomaly in an
//! export (missing dates, unresolved images, odd meta values) degrades to an
//! empty value instead of an error.
//!
//! # Example
//!
//! ```rust
//! use wxr_core::{WxrError, parse_str};
//!
//! match parse_str("not xml at all") {
//!     Ok(posts) => println!("{} posts", posts.len()),
//!     Err(WxrError::MalformedDocument(reason)) => println!("bad export: {}", reason),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

use crate::post::Post;

/// Main error type for WXR parsing operations.
#[derive(Error, Debug)]
pub enum WxrError {
    /// The input could not be decoded as a WXR document.
    ///
    /// Returned when the byte stream is not well-formed enough to decode,
    /// cannot be read, or when the root element is not `<rss>`. No posts are
    /// produced alongside this error.
    #[error("Malformed WXR document: {0}")]
    MalformedDocument(String),

    /// Parsing was stopped by a [`CancellationToken`](crate::CancellationToken).
    ///
    /// `posts` holds whatever was extracted before the cancellation was
    /// observed. It is empty when the token fired before item processing
    /// started, and should be treated as best-effort partial output otherwise.
    #[error("WXR parsing cancelled after {} posts", .posts.len())]
    Cancelled { posts: Vec<Post> },
}

impl WxrError {
    /// Returns `true` for [`WxrError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WxrError::Cancelled { .. })
    }

    /// Posts extracted before a cancellation, or an empty slice for any other error.
    pub fn partial_posts(&self) -> &[Post] {
        match self {
            WxrError::Cancelled { posts } => posts,
            WxrError::MalformedDocument(_) => &[],
        }
    }

    /// Consumes the error and returns the partial posts of a cancellation.
    pub fn into_partial_posts(self) -> Vec<Post> {
        match self {
            WxrError::Cancelled { posts } => posts,
            WxrError::MalformedDocument(_) => Vec::new(),
        }
    }
}

impl From<quick_xml::Error> for WxrError {
    fn from(err: quick_xml::Error) -> Self {
        WxrError::MalformedDocument(format!("failed to parse WXR XML: {}", err))
    }
}

/// Result type alias for WxrError.
///
/// This is a convenience alias for `std::result::Result<T, WxrError>`.
pub type Result<T> = std::result::Result<T, WxrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WxrError::MalformedDocument("root element is not <rss> (got \"feed\")".to_string());
        assert!(err.to_string().contains("Malformed WXR document"));
        assert!(err.to_string().contains("feed"));
    }

    #[test]
    fn test_cancelled_error_counts_posts() {
        let err = WxrError::Cancelled { posts: vec![Post::default(), Post::default()] };
        assert!(err.is_cancelled());
        assert!(err.to_string().contains("2 posts"));
        assert_eq!(err.partial_posts().len(), 2);
        assert_eq!(err.into_partial_posts().len(), 2);
    }

    #[test]
    fn test_malformed_has_no_partial_posts() {
        let err = WxrError::MalformedDocument("eof".to_string());
        assert!(!err.is_cancelled());
        assert!(err.partial_posts().is_empty());
    }
}
