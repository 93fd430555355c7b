//! Blogger export to Markdown posts
//!
//! Reads the whole export, keeps the posts and writes each one to
//! `<output_dir>/<slug>.md`. Problems with a single post are logged and
//! counted; only an unreadable input, a malformed feed or an output
//! directory that cannot be created stop the run.

use super::options::{ExportOptions, ImportMode};
use super::report::{ConversionReport, ExportWarning, WarningKind};
use crate::entry::{classify_entry, Classified, Entry};
use crate::feed::{parse_feed, parse_feed_lenient, FeedError, RawFeed};
use crate::renderer::{MarkdownRenderer, Options, Renderer};
use crate::slug;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to read {path:?}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse feed: {0}")]
    Parse(#[from] FeedError),
    #[error("failed to create output directory {path:?}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create {path:?}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to render {path:?}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Blogger export to Markdown converter
#[derive(Debug)]
pub struct Exporter {
    options: ExportOptions,
    renderer: MarkdownRenderer,
}

impl Exporter {
    /// Create a new exporter with the given options
    pub fn new(options: ExportOptions) -> Self {
        let renderer = MarkdownRenderer::new(Options {
            force_draft: options.force_draft,
        });
        Self { options, renderer }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Read the configured input file and export it
    pub fn run(&self) -> Result<ConversionReport, ExportError> {
        let input = fs::read(&self.options.input).map_err(|source| ExportError::ReadInput {
            path: self.options.input.clone(),
            source,
        })?;
        self.export(&input)
    }

    /// Export an in-memory Blogger feed
    pub fn export(&self, input: &[u8]) -> Result<ConversionReport, ExportError> {
        let start_time = Instant::now();
        let mut report = ConversionReport::new(
            &self.options.input,
            &self.options.output_dir,
            self.options.mode,
            self.options.dry_run,
        );

        let feed = self.parse(input, &mut report)?;
        let posts = self.classify(feed, &mut report);
        log::info!("Found {} posts", posts.len());

        if !self.options.dry_run {
            fs::create_dir_all(&self.options.output_dir).map_err(|source| {
                ExportError::CreateOutputDir {
                    path: self.options.output_dir.clone(),
                    source,
                }
            })?;
        }

        // file name -> index of the post last written there
        let mut written: HashMap<String, usize> = HashMap::new();

        for (index, entry) in posts.iter().enumerate() {
            let file_name = slug::file_name(&entry.title);
            let path = self.options.output_dir.join(&file_name);

            if file_name == ".md" {
                log::warn!("Title {:?} has no usable characters, writing {:?}", entry.title, path);
                report.add_warning(ExportWarning {
                    index,
                    title: entry.title.clone(),
                    kind: WarningKind::EmptySlug,
                    message: format!("title sanitizes to an empty slug, written as {}", file_name),
                });
            }

            if let Err(e) = self.write_entry(entry, &path) {
                log::error!("{}", e);
                report.statistics.failed += 1;
                report.add_warning(ExportWarning {
                    index,
                    title: entry.title.clone(),
                    kind: WarningKind::WriteFailed,
                    message: failure_message(&e, written.get(&file_name).copied()),
                });
                continue;
            }
            report.statistics.written += 1;

            if let Some(previous) = written.insert(file_name.clone(), index) {
                log::warn!(
                    "{} from post {} overwrote the one from post {}",
                    file_name,
                    index,
                    previous
                );
                report.statistics.overwritten += 1;
                report.add_warning(ExportWarning {
                    index,
                    title: entry.title.clone(),
                    kind: WarningKind::SlugCollision,
                    message: format!("{} replaces the file of post {}", file_name, previous),
                });
            }

            log::info!(
                "{} [{}] {}",
                entry.title,
                entry.tags.join(" "),
                entry.draft
            );
        }

        report.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(report)
    }

    fn parse(&self, input: &[u8], report: &mut ConversionReport) -> Result<RawFeed, FeedError> {
        match self.options.mode {
            ImportMode::Strict => parse_feed(input),
            ImportMode::Lossy => {
                let (feed, rejected) = parse_feed_lenient(input)?;
                report.statistics.rejected_entries = rejected.len();
                for entry in rejected {
                    log::warn!(
                        "Skipping entry {} ({:?}): {}",
                        entry.index,
                        entry.title,
                        entry.error
                    );
                    report.add_warning(ExportWarning {
                        index: entry.index,
                        title: entry.title,
                        kind: WarningKind::InvalidTimestamp,
                        message: entry.error.to_string(),
                    });
                }
                Ok(feed)
            }
        }
    }

    fn classify(&self, feed: RawFeed, report: &mut ConversionReport) -> Vec<Entry> {
        report.statistics.total_entries = feed.len() + report.statistics.rejected_entries;

        let mut posts = Vec::new();
        for raw in feed.entries {
            match classify_entry(raw, &self.options.schemes) {
                Classified::Post(entry) => posts.push(entry),
                Classified::Skipped { title, kind } => {
                    let kind = kind.as_deref().unwrap_or("none");
                    log::debug!("Skipping {:?} (kind: {})", title, kind);
                    report.statistics.skipped_entries += 1;
                }
            }
        }
        report.statistics.posts = posts.len();
        posts
    }

    /// Renders into memory before `path` is opened.
    fn write_entry(&self, entry: &Entry, path: &Path) -> Result<(), ExportError> {
        let mut rendered = Vec::new();
        self.renderer
            .format(entry, &mut rendered)
            .map_err(|source| ExportError::Render {
                path: path.to_path_buf(),
                source,
            })?;

        if self.options.dry_run {
            return Ok(());
        }

        let mut file = fs::File::create(path).map_err(|source| ExportError::CreateFile {
            path: path.to_path_buf(),
            source,
        })?;
        let write_error = |source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };
        file.write_all(&rendered).map_err(write_error)?;
        file.flush().map_err(write_error)
    }
}

/// Warning text for a post that failed; `previous` is the post whose file sat at the same path.
fn failure_message(error: &ExportError, previous: Option<usize>) -> String {
    match (error, previous) {
        (ExportError::Write { .. }, Some(previous)) => {
            format!("{} (the file of post {} was truncated)", error, previous)
        }
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
<entry>
  <published>2020-05-01T12:00:00Z</published>
  <category scheme="http://schemas.google.com/g/2005#kind" term="http://schemas.google.com/blogger/2008/kind#post"/>
  <title>Only Post</title>
  <content type="html">body</content>
</entry>
<entry>
  <published>2020-05-02T12:00:00Z</published>
  <category scheme="http://schemas.google.com/g/2005#kind" term="http://schemas.google.com/blogger/2008/kind#settings"/>
  <title>Setting</title>
  <content>x</content>
</entry>
</feed>"#;

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("never-created");
        let options = ExportOptions::default()
            .with_output_dir(&output_dir)
            .with_dry_run(true);

        let report = Exporter::new(options).export(FEED.as_bytes()).unwrap();

        assert!(!output_dir.exists());
        assert_eq!(report.statistics.total_entries, 2);
        assert_eq!(report.statistics.posts, 1);
        assert_eq!(report.statistics.skipped_entries, 1);
        assert_eq!(report.statistics.written, 1);
        assert!(report.dry_run);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions::default()
            .with_input(dir.path().join("missing.xml"))
            .with_output_dir(dir.path().join("posts"));

        let err = Exporter::new(options).run().unwrap_err();
        assert!(matches!(err, ExportError::ReadInput { .. }), "{:?}", err);
        assert!(!dir.path().join("posts").exists());
    }

    #[test]
    fn test_output_dir_blocked_by_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("posts");
        fs::write(&blocker, "not a directory").unwrap();

        let options = ExportOptions::default().with_output_dir(&blocker);
        let err = Exporter::new(options).export(FEED.as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::CreateOutputDir { .. }), "{:?}", err);
    }

    #[test]
    fn test_file_create_failure_is_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the target name makes File::create fail.
        fs::create_dir_all(dir.path().join("only-post.md")).unwrap();

        let options = ExportOptions::default().with_output_dir(dir.path());
        let report = Exporter::new(options).export(FEED.as_bytes()).unwrap();

        assert_eq!(report.statistics.failed, 1);
        assert_eq!(report.statistics.written, 0);
        assert!(report.has_failures());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::WriteFailed);
    }

    #[test]
    fn test_write_failure_names_truncated_file() {
        let path = PathBuf::from("posts/same.md");
        let write = ExportError::Write {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        let message = failure_message(&write, Some(3));
        assert!(message.contains("disk full"));
        assert!(message.contains("the file of post 3 was truncated"));
        assert!(!failure_message(&write, None).contains("truncated"));

        let render = ExportError::Render {
            path,
            source: io::Error::new(io::ErrorKind::Other, "bad body"),
        };
        assert!(!failure_message(&render, Some(3)).contains("truncated"));
    }

    #[test]
    fn test_rewrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("only-post.md");
        fs::write(&target, "x".repeat(4096)).unwrap();

        let options = ExportOptions::default().with_output_dir(dir.path());
        let report = Exporter::new(options).export(FEED.as_bytes()).unwrap();

        assert_eq!(report.statistics.written, 1);
        let written = fs::read_to_string(&target).unwrap();
        assert!(written.starts_with("---\ntitle: \"Only Post\"\n"));
        assert!(written.ends_with("---\nbody"));
    }
}
