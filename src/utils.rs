//! Utility functions for text normalization, log-friendly previews and file
//! system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace collapsing for scraped page text
//! - Char-boundary-safe truncation for logging and content previews
//! - File system validation for output directories

use itertools::Itertools;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Collapse every run of whitespace into one space and trim both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  Rust\n\t入門  "), "Rust 入門");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` characters (not bytes, so Japanese text
/// never splits inside a code point) and get an ellipsis and the number of
/// dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// First `max` characters of `s`, with `...` appended when anything was cut.
pub fn preview(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}...", &s[..cut]),
    }
}

/// Convert a source name to a file-name-friendly slug.
///
/// Lowercases the text, removes special characters, and joins words with
/// hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("Yahoo! JAPAN Tech Blog"), "yahoo-japan-tech-blog");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .split_whitespace()
        .join("-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then checks writability by creating a
/// temporary file inside it. The file is removed when the check ends.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let check = tempfile::NamedTempFile::new_in(path)?;
    if let Err(e) = check.close() {
        warn!(error = %e, "Failed to remove write check file");
    }
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Rust\n\t入門  "), "Rust 入門");
        assert_eq!(collapse_whitespace("a    b"), "a b");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // Each kana is three bytes in UTF-8.
        assert_eq!(truncate_for_log("あいうえお", 2), "あい…(+9 bytes)");
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Japan Dev Blog"), "japan-dev-blog");
        assert_eq!(slugify_title("Yahoo! JAPAN Tech Blog"), "yahoo-japan-tech-blog");
        assert_eq!(slugify_title("Multiple   Spaces"), "multiple-spaces");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("機械学習", 10), "機械学習");
        assert_eq!(preview("機械学習", 2), "機械...");
        assert_eq!(preview("", 2), "");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        let nested = nested.to_str().unwrap();
        ensure_writable_dir(nested).await.unwrap();
        assert!(std::path::Path::new(nested).is_dir());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_leaves_no_files_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        ensure_writable_dir(dir).await.unwrap();
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
