//! Atom export parser
//!
//! Walks the document with a pull reader and keeps only the elements the
//! converter reads. Elements are matched by local name, so `app:control`
//! and `control` are treated alike.

use super::timestamp::{Timestamp, TimestampError};
use super::types::{Category, RawFeed, RawFeedEntry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("XML parse error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("document is empty, expected a <feed> element")]
    EmptyDocument,
    #[error("expected a <feed> root element, found <{0}>")]
    UnexpectedRoot(String),
    #[error("document ended before all elements were closed")]
    Truncated,
    #[error("unexpected <{0}> after the <feed> element was closed")]
    TrailingElement(String),
    #[error("entry {index} ({title:?}): {source}")]
    Timestamp {
        index: usize,
        title: String,
        #[source]
        source: TimestampError,
    },
}

/// An entry dropped by [`parse_feed_lenient`] because its timestamp was unreadable.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    /// Position among all `<entry>` elements, starting at 0
    pub index: usize,
    pub title: String,
    pub error: TimestampError,
}

/// Parse an export, failing on the first malformed `<published>` value.
pub fn parse_feed(input: &[u8]) -> Result<RawFeed, FeedError> {
    let (feed, rejected) = FeedParser::new(false).parse(input)?;
    debug_assert!(rejected.is_empty());
    Ok(feed)
}

/// Parse an export, dropping entries whose `<published>` value is malformed.
///
/// Malformed XML is still an error.
pub fn parse_feed_lenient(input: &[u8]) -> Result<(RawFeed, Vec<RejectedEntry>), FeedError> {
    FeedParser::new(true).parse(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Published,
    Content,
    Draft,
}

#[derive(Debug, Default)]
struct EntryBuilder {
    published: Option<String>,
    categories: Vec<Category>,
    title: String,
    content: String,
    draft: Option<String>,
}

struct FeedParser {
    lenient: bool,
    entries: Vec<RawFeedEntry>,
    rejected: Vec<RejectedEntry>,
    entry_count: usize,
}

impl FeedParser {
    fn new(lenient: bool) -> Self {
        Self {
            lenient,
            entries: Vec::new(),
            rejected: Vec::new(),
            entry_count: 0,
        }
    }

    fn parse(mut self, input: &[u8]) -> Result<(RawFeed, Vec<RejectedEntry>), FeedError> {
        let mut reader = Reader::from_reader(input);

        // Number of currently open elements; the root sits at depth 0.
        let mut depth: usize = 0;
        let mut saw_root = false;
        let mut current: Option<EntryBuilder> = None;
        let mut in_control = false;
        let mut field: Option<Field> = None;
        // Elements opened inside the field being captured (xhtml content)
        let mut nested: usize = 0;
        let mut text = String::new();
        // Byte offset just past `<content ...>`, and whether child elements followed
        let mut content_start: usize = 0;
        let mut content_markup = false;
        let mut buf = Vec::new();

        loop {
            let event_start = reader.buffer_position() as usize;
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|source| FeedError::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                })?;

            match event {
                Event::Start(ref e) => {
                    if !saw_root {
                        check_root(e)?;
                        saw_root = true;
                    } else if depth == 0 {
                        return Err(trailing_element(e));
                    } else if field.is_some() {
                        nested += 1;
                        content_markup |= field == Some(Field::Content);
                    } else {
                        let name = e.local_name();
                        match (depth, name.as_ref()) {
                            (1, b"entry") => current = Some(EntryBuilder::default()),
                            (2, b"category") => {
                                if let Some(entry) = current.as_mut() {
                                    let position = reader.buffer_position() as u64;
                                    entry.categories.push(read_category(e, position)?);
                                }
                            }
                            (2, b"control") if current.is_some() => in_control = true,
                            (2, tag) if current.is_some() => {
                                field = match tag {
                                    b"title" => Some(Field::Title),
                                    b"published" => Some(Field::Published),
                                    b"content" => Some(Field::Content),
                                    _ => None,
                                };
                                text.clear();
                                content_start = reader.buffer_position() as usize;
                                content_markup = false;
                            }
                            (3, b"draft") if in_control => {
                                field = Some(Field::Draft);
                                text.clear();
                            }
                            _ => {}
                        }
                    }
                    depth += 1;
                }
                Event::Empty(ref e) => {
                    if !saw_root {
                        check_root(e)?;
                        saw_root = true;
                    } else if depth == 0 {
                        return Err(trailing_element(e));
                    } else if field.is_some() {
                        content_markup |= field == Some(Field::Content);
                    } else if depth == 1 && e.local_name().as_ref() == b"entry" {
                        self.finish_entry(EntryBuilder::default())?;
                    } else if let Some(entry) = current.as_mut() {
                        let position = reader.buffer_position() as u64;
                        read_empty(entry, e, depth, in_control, position)?;
                    }
                }
                Event::Text(ref e) if field.is_some() => {
                    let unescaped = e.unescape().map_err(|source| FeedError::Xml {
                        position: reader.buffer_position() as u64,
                        source,
                    })?;
                    text.push_str(&unescaped);
                }
                Event::CData(ref e) if field.is_some() => {
                    text.push_str(&String::from_utf8_lossy(e));
                }
                Event::End(ref e) => {
                    depth = depth.saturating_sub(1);
                    if nested > 0 {
                        nested -= 1;
                    } else if let Some(finished) = field.take() {
                        if let Some(entry) = current.as_mut() {
                            let value = if finished == Field::Content && content_markup {
                                let inner = input.get(content_start..event_start).unwrap_or(&[]);
                                String::from_utf8_lossy(inner).into_owned()
                            } else {
                                std::mem::take(&mut text)
                            };
                            match finished {
                                Field::Title => entry.title = value,
                                Field::Published => entry.published = Some(value),
                                Field::Content => entry.content = value,
                                Field::Draft => entry.draft = Some(value),
                            }
                        }
                    } else {
                        let name = e.local_name();
                        match (depth, name.as_ref()) {
                            (1, b"entry") => {
                                if let Some(builder) = current.take() {
                                    self.finish_entry(builder)?;
                                }
                            }
                            (2, b"control") => in_control = false,
                            _ => {}
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(FeedError::EmptyDocument);
        }
        if depth != 0 {
            return Err(FeedError::Truncated);
        }

        Ok((
            RawFeed {
                entries: self.entries,
            },
            self.rejected,
        ))
    }

    fn finish_entry(&mut self, builder: EntryBuilder) -> Result<(), FeedError> {
        let index = self.entry_count;
        self.entry_count += 1;

        let published = match builder.published.as_deref().map(Timestamp::parse) {
            None => None,
            Some(Ok(ts)) => Some(ts),
            Some(Err(source)) if self.lenient => {
                self.rejected.push(RejectedEntry {
                    index,
                    title: builder.title,
                    error: source,
                });
                return Ok(());
            }
            Some(Err(source)) => {
                return Err(FeedError::Timestamp {
                    index,
                    title: builder.title,
                    source,
                })
            }
        };

        self.entries.push(RawFeedEntry {
            published,
            categories: builder.categories,
            title: builder.title,
            content: builder.content,
            draft: builder.draft,
        });
        Ok(())
    }
}

fn trailing_element(e: &BytesStart) -> FeedError {
    let name = e.local_name();
    FeedError::TrailingElement(String::from_utf8_lossy(name.as_ref()).into_owned())
}

fn check_root(e: &BytesStart) -> Result<(), FeedError> {
    let name = e.local_name();
    if name.as_ref() == b"feed" {
        Ok(())
    } else {
        Err(FeedError::UnexpectedRoot(
            String::from_utf8_lossy(name.as_ref()).into_owned(),
        ))
    }
}

/// Self-closing element directly inside an entry (or its control block).
fn read_empty(
    entry: &mut EntryBuilder,
    e: &BytesStart,
    depth: usize,
    in_control: bool,
    position: u64,
) -> Result<(), FeedError> {
    let name = e.local_name();
    match (depth, name.as_ref()) {
        (2, b"category") => entry.categories.push(read_category(e, position)?),
        (2, b"title") => entry.title.clear(),
        (2, b"content") => entry.content.clear(),
        (2, b"published") => entry.published = Some(String::new()),
        (3, b"draft") if in_control => entry.draft = Some(String::new()),
        _ => {}
    }
    Ok(())
}

fn read_category(e: &BytesStart, position: u64) -> Result<Category, FeedError> {
    let mut category = Category::default();
    for attr in e.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map_err(|source| FeedError::Xml { position, source })?
            .into_owned();
        match attr.key.local_name().as_ref() {
            b"scheme" => category.scheme = value,
            b"term" => category.term = value,
            _ => {}
        }
    }
    Ok(category)
}
