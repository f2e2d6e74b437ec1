//! Main parsing API.
//!
//! This module turns a WXR export into a list of [`Post`]s. The entry point is
//! [`WxrParser`], configured through [`WxrParser::builder`], along with the
//! convenience functions [`parse`], [`parse_str`] and [`parse_with_cancel`]
//! that use the default configuration.
//!
//! # Example
//!
//! ```rust
//! use wxr_core::parse_str;
//!
//! let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.2/"><channel>
//!   <item>
//!     <title>Hello</title>
//!     <wp:post_id>1</wp:post_id>
//!     <wp:post_type>post</wp:post_type>
//!     <wp:status>publish</wp:status>
//!   </item>
//! </channel></rss>"#;
//!
//! let posts = parse_str(xml).unwrap();
//! assert_eq!(posts[0].title_rendered, "Hello");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::attachments::AttachmentIndex;
use crate::cancel::CancellationToken;
use crate::document::{Item, Rss};
use crate::extract::{
    AuthorExtractor, CategoryExtractor, DateExtractor, ExcerptExtractor, FeaturedImageExtractor, ImageExtractor,
    ItemExtractor, MetaExtractor, ModifiedDateExtractor,
};
use crate::filter::{DefaultFilter, Filter};
use crate::logger::{Logger, NoopLogger};
use crate::post::Post;
use crate::{Result, WxrError};

/// Counters collected while parsing.
///
/// Every item of the export is counted exactly once, either as extracted or
/// under one skip reason, so `extracted + skipped() == total_items`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Number of `<item>` elements in the channel, attachments included.
    pub total_items: usize,
    pub extracted: usize,
    /// Items rejected by the filter whose post type is not `post`, by post type.
    pub skipped_by_type: BTreeMap<String, usize>,
    /// Other items rejected by the filter, by status.
    pub skipped_by_status: BTreeMap<String, usize>,
    pub missing_id: usize,
    /// Items with an empty title, content and excerpt.
    pub empty_content: usize,
}

impl ParseStats {
    /// Total number of skipped items
    pub fn skipped(&self) -> usize {
        self.skipped_by_type.values().sum::<usize>()
            + self.skipped_by_status.values().sum::<usize>()
            + self.missing_id
            + self.empty_content
    }
}

/// Posts together with the counters of the run that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub posts: Vec<Post>,
    pub stats: ParseStats,
}

/// WXR parser with a pluggable filter, logger and field extractors.
///
/// # Example
///
/// ```rust
/// use wxr_core::WxrParser;
/// use wxr_core::filter::DefaultFilter;
///
/// let parser = WxrParser::builder()
///     .filter(DefaultFilter::new("page", "publish"))
///     .build();
/// let posts = parser.parse("<rss><channel></channel></rss>".as_bytes()).unwrap();
/// assert!(posts.is_empty());
/// ```
pub struct WxrParser {
    filter: Box<dyn Filter>,
    logger: Box<dyn Logger>,
    author_extractor: Box<dyn ItemExtractor>,
    excerpt_extractor: Box<dyn ItemExtractor>,
    date_extractor: Box<dyn ItemExtractor>,
    modified_date_extractor: Box<dyn ItemExtractor>,
    featured_image_extractor: Box<dyn ImageExtractor>,
}

impl WxrParser {
    /// Creates a parser that keeps published posts and logs nothing.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> WxrParserBuilder {
        WxrParserBuilder::new()
    }

    /// Parses a WXR export and returns the extracted posts in document order.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError::MalformedDocument`] if the input cannot be decoded.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Vec<Post>> {
        self.run(reader, None).map(|report| report.posts)
    }

    /// Parses a WXR export and also returns the skip counters.
    pub fn parse_report<R: Read>(&self, reader: R) -> Result<ParseReport> {
        self.run(reader, None)
    }

    /// Parses a WXR export, stopping early once `token` is cancelled.
    ///
    /// The token is checked before decoding, after decoding and before each
    /// item.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError::Cancelled`] with the posts extracted so far when
    /// the token fires, or [`WxrError::MalformedDocument`] if the input cannot
    /// be decoded.
    pub fn parse_with_cancel<R: Read>(&self, reader: R, token: &CancellationToken) -> Result<Vec<Post>> {
        self.run(reader, Some(token)).map(|report| report.posts)
    }

    fn run<R: Read>(&self, reader: R, token: Option<&CancellationToken>) -> Result<ParseReport> {
        let cancelled = || token.is_some_and(CancellationToken::is_cancelled);

        if cancelled() {
            return Err(WxrError::Cancelled { posts: Vec::new() });
        }

        self.log(format_args!("Starting WXR parsing"));
        let rss = Rss::from_reader(reader)?;

        if cancelled() {
            return Err(WxrError::Cancelled { posts: Vec::new() });
        }

        let items = &rss.channel.items;
        self.log(format_args!("Parsed WXR document, found {} items", items.len()));

        let attachments = AttachmentIndex::build(&rss.channel);
        let mut report = ParseReport {
            posts: Vec::new(),
            stats: ParseStats { total_items: items.len(), ..Default::default() },
        };

        for item in items {
            if cancelled() {
                self.log(format_args!("Parsing cancelled, returning {} posts parsed so far", report.posts.len()));
                return Err(WxrError::Cancelled { posts: report.posts });
            }

            if let Some(post) = self.process_item(item, &attachments, &mut report.stats) {
                report.posts.push(post);
            }
        }

        report.stats.extracted = report.posts.len();
        self.log_summary(&report.stats);

        Ok(report)
    }

    /// Apply the filter and validation rules, counting the item as skipped or
    /// transforming it into a post
    fn process_item(&self, item: &Item, attachments: &AttachmentIndex, stats: &mut ParseStats) -> Option<Post> {
        if !self.filter.accept(item) {
            if item.post_type != "post" {
                *stats.skipped_by_type.entry(item.post_type.clone()).or_default() += 1;
            } else {
                *stats.skipped_by_status.entry(item.status.clone()).or_default() += 1;
            }
            return None;
        }

        if item.post_id == 0 {
            self.log(format_args!("Skipping item with missing post_id"));
            stats.missing_id += 1;
            return None;
        }

        if item.title.is_empty() && item.content_encoded.is_empty() && item.excerpt_encoded.is_empty() {
            self.log(format_args!("Skipping post {}: missing title, content, and excerpt", item.post_id));
            stats.empty_content += 1;
            return None;
        }

        let post = self.transform_item(item, attachments);
        if !post.is_addressable() {
            self.log(format_args!(
                "Warning: Post {} has neither link nor slug, URL construction may fail",
                post.id
            ));
        }

        Some(post)
    }

    fn transform_item(&self, item: &Item, attachments: &AttachmentIndex) -> Post {
        Post {
            id: item.post_id,
            title_rendered: item.title.clone(),
            content_rendered: item.content_encoded.clone(),
            slug: item.post_name.clone(),
            link: item.link.clone(),
            excerpt: self.excerpt_extractor.extract(item),
            author: self.author_extractor.extract(item),
            categories: CategoryExtractor.categories(item),
            tags: CategoryExtractor.tags(item),
            date: self.date_extractor.extract(item),
            modified_date: self.modified_date_extractor.extract(item),
            featured_image: self.featured_image_extractor.extract(item, attachments),
            guid: item.guid.clone(),
            parent_id: item.post_parent,
            meta: MetaExtractor.extract(item),
        }
    }

    fn log_summary(&self, stats: &ParseStats) {
        self.log(format_args!(
            "WXR parsing complete: {} posts extracted, {} items skipped",
            stats.extracted,
            stats.skipped()
        ));
        if !stats.skipped_by_type.is_empty() {
            self.log(format_args!("Skipped by type: {:?}", stats.skipped_by_type));
        }
        if !stats.skipped_by_status.is_empty() {
            self.log(format_args!("Skipped by status: {:?}", stats.skipped_by_status));
        }
    }

    fn log(&self, args: fmt::Arguments<'_>) {
        self.logger.log(args);
    }
}

impl Default for WxrParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`WxrParser`].
///
/// Every component not set on the builder keeps its default.
///
/// # Example
///
/// ```rust
/// use wxr_core::WxrParser;
/// use wxr_core::extract::AuthorExtractor;
/// use wxr_core::filter::DefaultFilter;
///
/// let parser = WxrParser::builder()
///     .filter(DefaultFilter::new("post", ""))
///     .author_extractor(AuthorExtractor { meta_keys: vec!["byline".to_string()] })
///     .build();
/// ```
pub struct WxrParserBuilder {
    parser: WxrParser,
}

impl WxrParserBuilder {
    pub fn new() -> Self {
        Self {
            parser: WxrParser {
                filter: Box::new(DefaultFilter::default()),
                logger: Box::new(NoopLogger),
                author_extractor: Box::new(AuthorExtractor::default()),
                excerpt_extractor: Box::new(ExcerptExtractor::default()),
                date_extractor: Box::new(DateExtractor),
                modified_date_extractor: Box::new(ModifiedDateExtractor),
                featured_image_extractor: Box::new(FeaturedImageExtractor::default()),
            },
        }
    }

    pub fn filter(mut self, filter: impl Filter + 'static) -> Self {
        self.parser.filter = Box::new(filter);
        self
    }

    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.parser.logger = Box::new(logger);
        self
    }

    pub fn author_extractor(mut self, extractor: impl ItemExtractor + 'static) -> Self {
        self.parser.author_extractor = Box::new(extractor);
        self
    }

    pub fn excerpt_extractor(mut self, extractor: impl ItemExtractor + 'static) -> Self {
        self.parser.excerpt_extractor = Box::new(extractor);
        self
    }

    pub fn date_extractor(mut self, extractor: impl ItemExtractor + 'static) -> Self {
        self.parser.date_extractor = Box::new(extractor);
        self
    }

    pub fn modified_date_extractor(mut self, extractor: impl ItemExtractor + 'static) -> Self {
        self.parser.modified_date_extractor = Box::new(extractor);
        self
    }

    pub fn featured_image_extractor(mut self, extractor: impl ImageExtractor + 'static) -> Self {
        self.parser.featured_image_extractor = Box::new(extractor);
        self
    }

    pub fn build(self) -> WxrParser {
        self.parser
    }
}

impl Default for WxrParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a WXR export with the default parser.
///
/// # Example
///
/// ```rust,no_run
/// use std::fs::File;
///
/// let posts = wxr_core::parse(File::open("export.xml")?)?;
/// println!("{} posts", posts.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse<R: Read>(reader: R) -> Result<Vec<Post>> {
    WxrParser::new().parse(reader)
}

/// Parses a WXR export held in memory with the default parser.
pub fn parse_str(xml: &str) -> Result<Vec<Post>> {
    WxrParser::new().parse(xml.as_bytes())
}

/// Parses a WXR export with the default parser, stopping once `token` is cancelled.
pub fn parse_with_cancel<R: Read>(reader: R, token: &CancellationToken) -> Result<Vec<Post>> {
    WxrParser::new().parse_with_cancel(reader, token)
}

impl FromStr for ParseReport {
    type Err = WxrError;

    fn from_str(xml: &str) -> Result<Self> {
        WxrParser::new().parse_report(xml.as_bytes())
    }
}
