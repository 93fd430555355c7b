//! File name slugs derived from post titles.

use regex::Regex;
use std::sync::LazyLock;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9-]+").expect("slug pattern is valid"));

/// Lowercase the title, turn each space into a hyphen, then delete every run
/// of characters that is not an ASCII letter, digit or hyphen.
///
/// Words separated only by punctuation are merged: `"Hello!World"` becomes
/// `"helloworld"`. Non-ASCII letters are removed, so the result may be empty.
pub fn sanitize(title: &str) -> String {
    let base = title.to_lowercase().replace(' ', "-");
    DISALLOWED.replace_all(&base, "").into_owned()
}

/// Name of the Markdown file written for a title.
pub fn file_name(title: &str) -> String {
    format!("{}.md", sanitize(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_is_removed() {
        assert_eq!(sanitize("Hello, World!"), "hello-world");
        assert_eq!(sanitize("Hello!World"), "helloworld");
        assert_eq!(sanitize("What's new in 2.0?"), "whats-new-in-20");
    }

    #[test]
    fn test_spaces_become_hyphens() {
        assert_eq!(sanitize("  Multiple   Spaces  "), "--multiple---spaces--");
        assert_eq!(sanitize("already-hyphenated title"), "already-hyphenated-title");
    }

    #[test]
    fn test_tabs_are_not_spaces() {
        assert_eq!(sanitize("a\tb"), "ab");
    }

    #[test]
    fn test_empty_and_all_punctuation() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("!!!???"), "");
    }

    #[test]
    fn test_non_ascii_is_stripped() {
        assert_eq!(sanitize("Über!"), "ber");
        assert_eq!(sanitize("日本語 post"), "-post");
        assert_eq!(sanitize("café au lait"), "caf-au-lait");
    }

    #[test]
    fn test_deterministic() {
        let title = "Some *Title* (draft) #3";
        assert_eq!(sanitize(title), sanitize(title));
        assert_eq!(sanitize(title), "some-title-draft-3");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("First Post"), "first-post.md");
        assert_eq!(file_name(""), ".md");
    }
}
