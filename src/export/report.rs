//! Conversion report types for a Blogger export run

use super::options::ImportMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Type of warning during export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// `<published>` was not RFC3339; entry dropped (lossy mode)
    InvalidTimestamp,
    /// Title sanitized to nothing; file is named `.md`
    EmptySlug,
    /// An earlier post already used this file name and was overwritten
    SlugCollision,
    /// Creating, rendering or writing the file failed
    WriteFailed,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::InvalidTimestamp => write!(f, "invalid_timestamp"),
            WarningKind::EmptySlug => write!(f, "empty_slug"),
            WarningKind::SlugCollision => write!(f, "slug_collision"),
            WarningKind::WriteFailed => write!(f, "write_failed"),
        }
    }
}

/// A warning generated during export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportWarning {
    /// Index among feed entries for `InvalidTimestamp`, among posts otherwise
    pub index: usize,
    pub title: String,
    pub kind: WarningKind,
    pub message: String,
}

impl std::fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entry {} ({:?}): {}", self.index, self.title, self.message)
    }
}

/// Statistics about the export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStatistics {
    /// `<entry>` elements in the feed, rejected ones included
    pub total_entries: usize,
    /// Entries classified as posts
    pub posts: usize,
    /// Comments, settings, pages and other non-post entries
    pub skipped_entries: usize,
    /// Entries dropped for an unreadable timestamp
    pub rejected_entries: usize,
    /// Files written (or rendered, in a dry run)
    pub written: usize,
    /// Posts whose file could not be produced
    pub failed: usize,
    /// Files replaced by a later post with the same slug
    pub overwritten: usize,
    pub warning_count: usize,
}

/// Complete export report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input_file: String,
    pub output_dir: String,
    pub mode: ImportMode,
    pub dry_run: bool,
    /// Start of the run, RFC3339
    pub timestamp: String,
    pub duration_ms: u64,
    pub statistics: ConversionStatistics,
    pub warnings: Vec<ExportWarning>,
}

impl ConversionReport {
    /// Create a new empty report
    pub fn new(input: &Path, output_dir: &Path, mode: ImportMode, dry_run: bool) -> Self {
        Self {
            input_file: input.display().to_string(),
            output_dir: output_dir.display().to_string(),
            mode,
            dry_run,
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: 0,
            statistics: ConversionStatistics::default(),
            warnings: Vec::new(),
        }
    }

    /// Add a warning to the report
    pub fn add_warning(&mut self, warning: ExportWarning) {
        self.statistics.warning_count += 1;
        self.warnings.push(warning);
    }

    pub fn has_failures(&self) -> bool {
        self.statistics.failed > 0
    }

    /// Process exit status for this run: 1 when any post failed.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to human-readable text format
    pub fn to_text(&self) -> String {
        let stats = &self.statistics;
        let mut output = String::new();

        output.push_str("Blogger Export Report\n");
        output.push_str("=====================\n");
        output.push_str(&format!("Input:  {}\n", self.input_file));
        output.push_str(&format!("Output: {}\n", self.output_dir));
        output.push_str(&format!("Mode:   {}\n", self.mode));
        output.push_str(&format!("Date:   {}\n", self.timestamp));
        output.push_str(&format!("Time:   {}ms\n\n", self.duration_ms));

        output.push_str("Statistics\n");
        output.push_str("----------\n");
        output.push_str(&format!("Entries:         {}\n", stats.total_entries));
        output.push_str(&format!("Posts:           {}\n", stats.posts));
        output.push_str(&format!("Skipped:         {}\n", stats.skipped_entries));
        output.push_str(&format!("Rejected:        {}\n", stats.rejected_entries));
        output.push_str(&format!("Written:         {}\n", stats.written));
        output.push_str(&format!("Overwritten:     {}\n", stats.overwritten));
        output.push_str(&format!("Failed:          {}\n", stats.failed));
        output.push_str(&format!("Warnings:        {}\n\n", stats.warning_count));

        if !self.warnings.is_empty() {
            output.push_str("Warnings\n");
            output.push_str("--------\n");
            for warning in &self.warnings {
                output.push_str(&format!("⚠ [{}] {}\n", warning.kind, warning));
            }
            output.push('\n');
        }

        output.push_str("Result\n");
        output.push_str("------\n");
        if stats.failed > 0 {
            output.push_str(&format!("✗ {} post(s) could not be written\n", stats.failed));
        } else if self.dry_run {
            output.push_str("✓ Dry run completed, no files were written\n");
        } else if stats.warning_count > 0 {
            output.push_str("✓ Export completed with warnings\n");
            output.push_str(&format!("✓ Posts written to {}\n", self.output_dir));
        } else {
            output.push_str("✓ Export completed successfully\n");
            output.push_str(&format!("✓ Posts written to {}\n", self.output_dir));
        }

        output
    }
}
