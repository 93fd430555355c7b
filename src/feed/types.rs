use super::timestamp::Timestamp;

/// Decoded export document, entries in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeed {
    pub entries: Vec<RawFeedEntry>,
}

/// One `<entry>` element as it appears in the export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedEntry {
    /// `None` when the entry has no `<published>` element
    pub published: Option<Timestamp>,
    pub categories: Vec<Category>,
    pub title: String,
    /// Unescaped body, usually HTML
    pub content: String,
    /// Text of `<app:control><app:draft>`
    pub draft: Option<String>,
}

/// `<category scheme="..." term="..."/>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub scheme: String,
    pub term: String,
}

impl Category {
    pub fn new(scheme: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            term: term.into(),
        }
    }
}

impl RawFeed {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
