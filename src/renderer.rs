use std::io;
use std::io::Write;

use crate::entry::Entry;

#[derive(Debug, Default, Clone)]
pub struct Options {
    /// Write `draft: true` for every post regardless of its control flag
    pub force_draft: bool,
}

pub trait Renderer {
    fn new(options: Options) -> Self;
    fn format(&self, entry: &Entry, output: &mut dyn Write) -> io::Result<()>;
}

/// Renders a post as YAML front matter followed by the untouched body.
///
/// ```text
/// ---
/// title: "First Post"
/// date: 2007-04-17T15:09:01-07:00
/// draft: false
/// tags: [ "go", "tools" ]
/// ---
/// <p>Hi</p>
/// ```
///
/// The title is written between quotes as is; embedded quotes are not escaped.
#[derive(Debug)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Renderer for MarkdownRenderer {
    fn new(options: Options) -> Self {
        MarkdownRenderer { options }
    }

    fn format(&self, entry: &Entry, output: &mut dyn Write) -> io::Result<()> {
        writeln!(output, "---")?;
        writeln!(output, "title: \"{}\"", entry.title)?;
        writeln!(output, "date: {}", entry.published.to_rfc3339())?;
        writeln!(output, "draft: {}", self.options.force_draft || entry.draft)?;
        write!(output, "tags: [ ")?;
        for (i, tag) in entry.tags.iter().enumerate() {
            if i > 0 {
                write!(output, ", ")?;
            }
            write!(output, "\"{}\"", tag)?;
        }
        writeln!(output, " ]")?;
        writeln!(output, "---")?;
        output.write_all(entry.content.as_bytes())?;
        Ok(())
    }
}

impl MarkdownRenderer {
    pub fn render_to_string(&self, entry: &Entry) -> io::Result<String> {
        let mut buf = Vec::new();
        self.format(entry, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
