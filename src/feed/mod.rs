//! Blogger Atom export decoding
//!
//! Only the parts of the Atom document the converter needs are decoded:
//! entries with their publish time, categories, title, content and the
//! `app:control/app:draft` flag. Everything else in the export is skipped.

mod parser;
mod timestamp;
mod types;

pub use parser::{parse_feed, parse_feed_lenient, FeedError, RejectedEntry};
pub use timestamp::{Timestamp, TimestampError};
pub use types::{Category, RawFeed, RawFeedEntry};
