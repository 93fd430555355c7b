//! Post classification
//!
//! A Blogger export mixes posts, comments, pages, settings and the template
//! in one feed. Each entry carries a `kind` category telling them apart;
//! only posts become [`Entry`] values.

use crate::feed::{RawFeed, RawFeedEntry, Timestamp};
use serde::{Deserialize, Serialize};

/// Scheme of the category that tells posts from comments, settings, etc.
pub const KIND_SCHEME: &str = "http://schemas.google.com/g/2005#kind";
/// Scheme of the categories holding user-assigned labels.
pub const TAG_SCHEME: &str = "http://www.blogger.com/atom/ns#";
/// A kind term with this suffix marks a post (`...#kind#post`).
pub const POST_KIND_SUFFIX: &str = "post";

/// Category schemes the classifier looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schemes {
    #[serde(default = "default_kind_scheme")]
    pub kind: String,
    #[serde(default = "default_tag_scheme")]
    pub tag: String,
}

fn default_kind_scheme() -> String {
    KIND_SCHEME.to_string()
}

fn default_tag_scheme() -> String {
    TAG_SCHEME.to_string()
}

impl Default for Schemes {
    fn default() -> Self {
        Self {
            kind: default_kind_scheme(),
            tag: default_tag_scheme(),
        }
    }
}

/// A blog post ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub content: String,
    pub published: Timestamp,
    /// Labels in the order their categories appear, duplicates kept
    pub tags: Vec<String>,
    pub draft: bool,
}

/// Outcome of classifying a single raw entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Post(Entry),
    /// Not a post; carries the kind term when one was present
    Skipped { title: String, kind: Option<String> },
}

impl Entry {
    /// Map a raw entry to a post, or `None` if it is not a post.
    pub fn from_raw(raw: RawFeedEntry, schemes: &Schemes) -> Option<Entry> {
        match classify_entry(raw, schemes) {
            Classified::Post(entry) => Some(entry),
            Classified::Skipped { .. } => None,
        }
    }
}

pub fn classify_entry(raw: RawFeedEntry, schemes: &Schemes) -> Classified {
    let mut tags = Vec::new();
    let mut is_post = false;
    let mut kind = None;

    for category in raw.categories {
        if category.scheme == schemes.tag {
            tags.push(category.term);
        } else if category.scheme == schemes.kind {
            if category.term.ends_with(POST_KIND_SUFFIX) {
                is_post = true;
            }
            kind = Some(category.term);
        }
    }

    if !is_post {
        return Classified::Skipped {
            title: raw.title,
            kind,
        };
    }

    Classified::Post(Entry {
        title: raw.title,
        content: raw.content,
        published: raw.published.unwrap_or_else(Timestamp::zero),
        tags,
        draft: raw.draft.as_deref() == Some("yes"),
    })
}

/// Keep the posts of a feed, in feed order.
pub fn posts_from_feed(feed: RawFeed, schemes: &Schemes) -> Vec<Entry> {
    feed.entries
        .into_iter()
        .filter_map(|raw| Entry::from_raw(raw, schemes))
        .collect()
}
