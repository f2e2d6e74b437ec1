pub mod attachments;
pub mod cancel;
pub mod date;
pub mod document;
pub mod error;
pub mod extract;
pub mod filter;
pub mod logger;
pub mod meta;
pub mod parser;
pub mod post;
#[doc(hidden)]
pub mod xml_tree;

pub use attachments::AttachmentIndex;
pub use cancel::CancellationToken;
pub use date::{DateLayout, normalize_date};
pub use document::{Author, Category, Channel, Item, MetaEntry, Rss};
pub use error::{Result, WxrError};
pub use extract::{
    AuthorExtractor, CategoryExtractor, DateExtractor, ExcerptExtractor, FeaturedImageExtractor, ImageExtractor,
    ItemExtractor, MetaExtractor, ModifiedDateExtractor,
};
pub use filter::{DefaultFilter, Filter};
#[cfg(feature = "tracing")]
pub use logger::TracingLogger;
pub use logger::{Logger, NoopLogger};
pub use meta::meta_value;
pub use parser::{ParseReport, ParseStats, WxrParser, WxrParserBuilder, parse, parse_str, parse_with_cancel};
pub use post::Post;
