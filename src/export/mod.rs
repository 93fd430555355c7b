//! Blogger export to Markdown module
//!
//! Drives a whole run: read the export, parse it, keep the posts and write
//! one Markdown file per post. Two modes decide what a malformed
//! `<published>` value does:
//! - Strict: Abort the run
//! - Lossy: Drop the entry with a warning

mod exporter;
mod options;
mod report;

pub use exporter::{ExportError, Exporter};
pub use options::{ExportOptions, ImportMode, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
pub use report::{ConversionReport, ConversionStatistics, ExportWarning, WarningKind};
