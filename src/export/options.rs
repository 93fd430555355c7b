//! Export options

use crate::entry::Schemes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input file read when none is given.
pub const DEFAULT_INPUT: &str = "out.xml";
/// Directory posts are written to when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "posts";

/// Import mode determines how entries with unreadable timestamps are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Abort the whole run on the first bad `<published>` value
    #[default]
    Strict,
    /// Drop the offending entry with a warning and keep going
    Lossy,
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportMode::Strict => write!(f, "strict"),
            ImportMode::Lossy => write!(f, "lossy"),
        }
    }
}

/// Options for a single export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Blogger Atom export to read
    pub input: PathBuf,
    /// Directory receiving one `<slug>.md` per post
    pub output_dir: PathBuf,
    pub mode: ImportMode,
    /// Mark every post as a draft in its front matter
    pub force_draft: bool,
    /// Render everything but write nothing
    pub dry_run: bool,
    pub schemes: Schemes,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mode: ImportMode::Strict,
            force_draft: false,
            dry_run: false,
            schemes: Schemes::default(),
        }
    }
}

impl ExportOptions {
    /// Create new export options with specified mode
    pub fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_force_draft(mut self, force_draft: bool) -> Self {
        self.force_draft = force_draft;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_schemes(mut self, schemes: Schemes) -> Self {
        self.schemes = schemes;
        self
    }
}
