//! Optional TOML configuration.
//!
//! ```toml
//! [export]
//! input = "blog-export.xml"
//! output = "content/posts"
//! mode = "lossy"
//! force_draft = false
//!
//! [schemes]
//! kind = "http://schemas.google.com/g/2005#kind"
//! tag = "http://www.blogger.com/atom/ns#"
//! ```

use crate::entry::Schemes;
use crate::export::{ExportOptions, ImportMode};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "blogger2md.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Blogger2mdConfig {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub schemes: Option<Schemes>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExportSection {
    #[serde(alias = "file")]
    pub input: Option<String>,
    #[serde(alias = "output_dir")]
    pub output: Option<String>,
    pub mode: Option<ImportMode>,
    pub force_draft: Option<bool>,
}

impl Blogger2mdConfig {
    /// Overlay the configured values on `options`.
    pub fn apply(&self, mut options: ExportOptions) -> ExportOptions {
        if let Some(input) = normalize_field(self.export.input.as_deref()) {
            options.input = PathBuf::from(input);
        }
        if let Some(output) = normalize_field(self.export.output.as_deref()) {
            options.output_dir = PathBuf::from(output);
        }
        if let Some(mode) = self.export.mode {
            options.mode = mode;
        }
        if let Some(force_draft) = self.export.force_draft {
            options.force_draft = force_draft;
        }
        if let Some(schemes) = &self.schemes {
            options.schemes = schemes.clone();
        }
        options
    }
}

/// Values given on the command line. `None` and `false` mean the flag was absent.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub mode: Option<ImportMode>,
    pub force_draft: bool,
    pub dry_run: bool,
}

/// Defaults, then the config file, then command line flags.
pub fn resolve(config: Option<&Blogger2mdConfig>, overrides: &Overrides) -> ExportOptions {
    let mut options = ExportOptions::default();
    if let Some(config) = config {
        options = config.apply(options);
    }

    if let Some(input) = &overrides.input {
        options.input = input.clone();
    }
    if let Some(output_dir) = &overrides.output_dir {
        options.output_dir = output_dir.clone();
    }
    if let Some(mode) = overrides.mode {
        options.mode = mode;
    }
    if overrides.force_draft {
        options.force_draft = true;
    }
    options.dry_run = overrides.dry_run;
    options
}

fn normalize_field(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: Blogger2mdConfig,
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path:?}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config file at {path:?}: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
        path: PathBuf,
    },
}

/// Load `explicit`, or `./blogger2md.toml` when it exists.
///
/// A missing explicit file is an error; a missing default file is not.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<ConfigLoadResult>, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(CONFIG_FILENAME);
            if !path.exists() {
                return Ok(None);
            }
            path
        }
    };

    let config_text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        source,
        path: path.clone(),
    })?;

    let config = parse_config(&config_text).map_err(|source| ConfigError::Parse {
        source,
        path: path.clone(),
    })?;

    Ok(Some(ConfigLoadResult { config, path }))
}

pub fn parse_config(text: &str) -> Result<Blogger2mdConfig, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{KIND_SCHEME, TAG_SCHEME};

    #[test]
    fn test_empty_config_keeps_defaults() {
        let config = parse_config("").unwrap();
        let options = config.apply(ExportOptions::default());
        assert_eq!(options.input, PathBuf::from("out.xml"));
        assert_eq!(options.output_dir, PathBuf::from("posts"));
        assert_eq!(options.mode, ImportMode::Strict);
    }

    #[test]
    fn test_export_section() {
        let config = parse_config(
            r#"
            [export]
            input = "blog.xml"
            output = "  content/posts  "
            mode = "lossy"
            force_draft = true
            "#,
        )
        .unwrap();
        let options = config.apply(ExportOptions::default());
        assert_eq!(options.input, PathBuf::from("blog.xml"));
        assert_eq!(options.output_dir, PathBuf::from("content/posts"));
        assert_eq!(options.mode, ImportMode::Lossy);
        assert!(options.force_draft);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = parse_config("[export]\ninput = \"  \"\n").unwrap();
        let options = config.apply(ExportOptions::default());
        assert_eq!(options.input, PathBuf::from("out.xml"));
    }

    #[test]
    fn test_partial_schemes_section() {
        let config = parse_config("[schemes]\ntag = \"urn:labels\"\n").unwrap();
        let options = config.apply(ExportOptions::default());
        assert_eq!(options.schemes.kind, KIND_SCHEME);
        assert_eq!(options.schemes.tag, "urn:labels");
        assert_ne!(options.schemes.tag, TAG_SCHEME);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(parse_config("[export]\nmode = \"preserve\"\n").is_err());
    }

    #[test]
    fn test_flags_beat_config() {
        let config = parse_config(
            "[export]\ninput = \"blog.xml\"\noutput = \"from-config\"\nmode = \"lossy\"\n",
        )
        .unwrap();
        let overrides = Overrides {
            output_dir: Some(PathBuf::from("from-flag")),
            mode: Some(ImportMode::Strict),
            ..Overrides::default()
        };

        let options = resolve(Some(&config), &overrides);
        assert_eq!(options.output_dir, PathBuf::from("from-flag"));
        assert_eq!(options.mode, ImportMode::Strict);
        assert_eq!(options.input, PathBuf::from("blog.xml"));
    }

    #[test]
    fn test_config_force_draft_survives_without_flag() {
        let config = parse_config("[export]\nforce_draft = true\n").unwrap();
        let options = resolve(Some(&config), &Overrides::default());
        assert!(options.force_draft);
        assert!(!options.dry_run);

        let flagged = Overrides {
            force_draft: true,
            dry_run: true,
            ..Overrides::default()
        };
        let options = resolve(None, &flagged);
        assert!(options.force_draft);
        assert!(options.dry_run);
        assert_eq!(options.output_dir, PathBuf::from("posts"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[export]\noutput = \"out\"\n").unwrap();

        let loaded = load_config(Some(path.as_path())).unwrap().unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.export.output.as_deref(), Some("out"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[export\n").unwrap();
        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
