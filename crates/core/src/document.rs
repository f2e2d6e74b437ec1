//! Typed model of a WordPress eXtended RSS (WXR) export.
//!
//! This module provides the [`Rss`] document and its parts ([`Channel`],
//! [`Item`], [`Category`], [`Author`], [`MetaEntry`]), decoded from raw XML.
//! Namespaced WordPress fields are matched by namespace URI and local name,
//! so the prefixes chosen by the exporting site do not matter. Plain RSS
//! fields (`channel`, `item`, `title`, `link`, `guid`, `pubDate`, `category`)
//! match by local name in any namespace, which covers exports that declare a
//! default `xmlns` on `<rss>`.
//!
//! # Example
//!
//! ```rust
//! use wxr_core::document::Rss;
//!
//! let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.2/">
//!     <channel>
//!         <item>
//!             <title>Hello</title>
//!             <wp:post_id>1</wp:post_id>
//!             <wp:post_type>post</wp:post_type>
//!         </item>
//!     </channel>
//! </rss>"#;
//!
//! let doc: Rss = xml.parse().unwrap();
//! assert_eq!(doc.channel.items[0].post_id, 1);
//! ```

use std::io::{BufReader, Read};
use std::str::FromStr;

use crate::xml_tree::{XmlElement, read_root};
use crate::{Result, WxrError};

/// WordPress export namespace (`wp:` prefix by convention).
pub const WP_NS: &str = "http://wordpress.org/export/1.2/";
/// RSS content module namespace (`content:encoded`).
pub const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
/// WordPress excerpt namespace (`excerpt:encoded`).
pub const EXCERPT_NS: &str = "http://wordpress.org/export/1.2/excerpt/";
/// Dublin Core namespace (`dc:creator`).
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// A decoded WXR document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rss {
    pub channel: Channel,
}

/// The `<channel>` of a WXR export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    /// `wp:base_site_url`
    pub base_site_url: String,
    /// `wp:base_blog_url`
    pub base_blog_url: String,
    pub items: Vec<Item>,
    pub authors: Vec<Author>,
}

/// One `<item>`: a post, page, attachment or any other content unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub pub_date: String,
    /// `dc:creator`
    pub creator: String,
    /// `content:encoded`
    pub content_encoded: String,
    /// `excerpt:encoded`
    pub excerpt_encoded: String,
    /// `wp:post_id`, `0` when missing or not an integer
    pub post_id: i64,
    pub post_date: String,
    pub post_date_gmt: String,
    pub post_modified: String,
    pub post_modified_gmt: String,
    /// `wp:post_parent`, `0` for top-level items
    pub post_parent: i64,
    /// `wp:post_name` (the slug)
    pub post_name: String,
    pub post_type: String,
    pub status: String,
    pub attachment_url: String,
    /// `wp:postmeta` entries in document order; keys may repeat
    pub meta: Vec<MetaEntry>,
    pub categories: Vec<Category>,
}

/// A `<category>` entry of an item. Tags use the same element with `domain="post_tag"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub domain: String,
    pub nicename: String,
    pub value: String,
}

/// A `wp:author` record of the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub login: String,
    pub display_name: String,
}

/// A `wp:postmeta` key/value pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

impl MetaEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

impl Rss {
    /// Decodes a WXR document from a byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError::MalformedDocument`] if the stream cannot be read or
    /// decoded as XML, or if its root element is not `<rss>`. The error
    /// message carries the root element name that was found (empty when the
    /// input had no element at all).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let root = read_root(BufReader::new(reader))?;

        let root_name = root.as_ref().map(|r| r.local_name.as_str()).unwrap_or_default();
        if root_name != "rss" {
            return Err(WxrError::MalformedDocument(format!(
                "invalid WXR XML: root element is not <rss> (got {:?})",
                root_name
            )));
        }

        let channel = root
            .as_ref()
            .and_then(|r| r.children_local("channel").last())
            .map(Channel::from_element)
            .unwrap_or_default();

        Ok(Self { channel })
    }
}

impl FromStr for Rss {
    type Err = WxrError;

    fn from_str(xml: &str) -> Result<Self> {
        Self::from_reader(xml.as_bytes())
    }
}

impl Channel {
    fn from_element(el: &XmlElement) -> Self {
        Self {
            title: el.local_child_text("title"),
            link: el.local_child_text("link"),
            base_site_url: el.child_text(Some(WP_NS), "base_site_url"),
            base_blog_url: el.child_text(Some(WP_NS), "base_blog_url"),
            items: el.children_local("item").map(Item::from_element).collect(),
            authors: el.children_named(Some(WP_NS), "author").map(Author::from_element).collect(),
        }
    }
}

impl Item {
    fn from_element(el: &XmlElement) -> Self {
        let wp = |name: &str| el.child_text(Some(WP_NS), name);

        Self {
            title: el.local_child_text("title"),
            link: el.local_child_text("link"),
            guid: el.local_child_text("guid"),
            pub_date: el.local_child_text("pubDate"),
            creator: el.child_text(Some(DC_NS), "creator"),
            content_encoded: el.child_text(Some(CONTENT_NS), "encoded"),
            excerpt_encoded: el.child_text(Some(EXCERPT_NS), "encoded"),
            post_id: parse_int(&wp("post_id")),
            post_date: wp("post_date"),
            post_date_gmt: wp("post_date_gmt"),
            post_modified: wp("post_modified"),
            post_modified_gmt: wp("post_modified_gmt"),
            post_parent: parse_int(&wp("post_parent")),
            post_name: wp("post_name"),
            post_type: wp("post_type"),
            status: wp("status"),
            attachment_url: wp("attachment_url"),
            meta: el
                .children_named(Some(WP_NS), "postmeta")
                .map(|m| MetaEntry::new(m.child_text(Some(WP_NS), "meta_key"), m.child_text(Some(WP_NS), "meta_value")))
                .collect(),
            categories: el
                .children_local("category")
                .map(|c| Category {
                    domain: c.attr("domain").unwrap_or_default().to_string(),
                    nicename: c.attr("nicename").unwrap_or_default().to_string(),
                    value: c.text.clone(),
                })
                .collect(),
        }
    }
}

impl Author {
    fn from_element(el: &XmlElement) -> Self {
        Self {
            id: parse_int(&el.child_text(Some(WP_NS), "author_id")),
            login: el.child_text(Some(WP_NS), "author_login"),
            display_name: el.child_text(Some(WP_NS), "author_display_name"),
        }
    }
}

/// Integer fields are read leniently: surrounding whitespace is ignored and
/// anything that is not an integer counts as absent (`0`).
fn parse_int(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_WXR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
    xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
    <title>Test Site</title>
    <link>https://example.com</link>
    <wp:base_site_url>https://example.com/</wp:base_site_url>
    <wp:author>
        <wp:author_id>3</wp:author_id>
        <wp:author_login><![CDATA[jdoe]]></wp:author_login>
        <wp:author_display_name><![CDATA[John Doe]]></wp:author_display_name>
    </wp:author>
    <item>
        <title><![CDATA[Test Post Title]]></title>
        <link>https://example.com/test-post</link>
        <guid isPermaLink="false">https://example.com/?p=123</guid>
        <dc:creator><![CDATA[John Doe]]></dc:creator>
        <content:encoded><![CDATA[<p>Body</p>]]></content:encoded>
        <excerpt:encoded><![CDATA[Short]]></excerpt:encoded>
        <wp:post_id> 123 </wp:post_id>
        <wp:post_parent>0</wp:post_parent>
        <wp:post_type><![CDATA[post]]></wp:post_type>
        <wp:status><![CDATA[publish]]></wp:status>
        <category domain="category" nicename="news"><![CDATA[News]]></category>
        <wp:postmeta>
            <wp:meta_key><![CDATA[redator]]></wp:meta_key>
            <wp:meta_value><![CDATA[Maria]]></wp:meta_value>
        </wp:postmeta>
    </item>
</channel>
</rss>"#;

    #[test]
    fn test_decode_channel_and_item() {
        let doc = Rss::from_str(SAMPLE_WXR).unwrap();
        let channel = &doc.channel;

        assert_eq!(channel.title, "Test Site");
        assert_eq!(channel.base_site_url, "https://example.com/");
        assert_eq!(channel.authors.len(), 1);
        assert_eq!(channel.authors[0].id, 3);
        assert_eq!(channel.authors[0].display_name, "John Doe");

        let item = &channel.items[0];
        assert_eq!(item.title, "Test Post Title");
        assert_eq!(item.guid, "https://example.com/?p=123");
        assert_eq!(item.creator, "John Doe");
        assert_eq!(item.content_encoded, "<p>Body</p>");
        assert_eq!(item.excerpt_encoded, "Short");
        assert_eq!(item.post_id, 123);
        assert_eq!(item.post_type, "post");
        assert_eq!(item.categories[0].domain, "category");
        assert_eq!(item.categories[0].nicename, "news");
        assert_eq!(item.categories[0].value, "News");
        assert_eq!(item.meta, vec![MetaEntry::new("redator", "Maria")]);
    }

    #[test]
    fn test_prefix_choice_is_irrelevant() {
        let xml = r#"<rss xmlns:export="http://wordpress.org/export/1.2/"
                          xmlns:body="http://purl.org/rss/1.0/modules/content/">
            <channel><item>
                <export:post_id>9</export:post_id>
                <body:encoded>Text</body:encoded>
            </item></channel></rss>"#;
        let doc = Rss::from_str(xml).unwrap();
        assert_eq!(doc.channel.items[0].post_id, 9);
        assert_eq!(doc.channel.items[0].content_encoded, "Text");
    }

    #[test]
    fn test_wrong_namespace_not_matched() {
        let xml = r#"<rss xmlns:wp="http://example.com/not-wordpress/">
            <channel><item><wp:post_id>9</wp:post_id></item></channel></rss>"#;
        let doc = Rss::from_str(xml).unwrap();
        assert_eq!(doc.channel.items[0].post_id, 0);
    }

    #[test]
    fn test_default_namespace_rss_fields() {
        let xml = r#"<rss xmlns="http://backend.userland.com/rss2" xmlns:wp="http://wordpress.org/export/1.2/">
            <channel>
                <title>Site</title>
                <item>
                    <title>Hello</title>
                    <link>https://example.com/hello/</link>
                    <guid>https://example.com/?p=5</guid>
                    <category domain="post_tag">Rust</category>
                    <wp:post_id>5</wp:post_id>
                    <wp:post_type>post</wp:post_type>
                </item>
            </channel></rss>"#;
        let doc = Rss::from_str(xml).unwrap();
        assert_eq!(doc.channel.title, "Site");

        let item = &doc.channel.items[0];
        assert_eq!(item.title, "Hello");
        assert_eq!(item.link, "https://example.com/hello/");
        assert_eq!(item.guid, "https://example.com/?p=5");
        assert_eq!(item.categories[0].value, "Rust");
        assert_eq!(item.post_id, 5);
    }

    #[test]
    fn test_non_numeric_id_is_absent() {
        let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.2/">
            <channel><item><wp:post_id>abc</wp:post_id></item></channel></rss>"#;
        let doc = Rss::from_str(xml).unwrap();
        assert_eq!(doc.channel.items[0].post_id, 0);
    }

    #[test]
    fn test_wrong_root_reports_name() {
        let err = Rss::from_str("<?xml version=\"1.0\"?><notrss><channel></channel></notrss>").unwrap_err();
        assert!(matches!(err, WxrError::MalformedDocument(_)));
        assert!(err.to_string().contains("\"notrss\""));
    }

    #[test]
    fn test_not_xml_reports_empty_root() {
        let err = Rss::from_str("not xml at all").unwrap_err();
        assert!(matches!(err, WxrError::MalformedDocument(_)));
        assert!(err.to_string().contains("(got \"\")"));
    }

    #[test]
    fn test_rss_without_channel() {
        let doc = Rss::from_str("<rss version=\"2.0\"/>").unwrap();
        assert!(doc.channel.items.is_empty());
    }
}
