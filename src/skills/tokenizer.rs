//! Word segmentation for Japanese-capable text.
//!
//! Japanese has no spaces between words, so the extractor cannot find skill
//! terms by splitting on whitespace. [`LexicalMatcher`] runs the morphological
//! analyser from `lindera` (IPADIC) and falls back to a Unicode word splitter
//! when the dictionary cannot be loaded or yields nothing.
//!
//! Both paths NFKC-normalize their input first, so full-width Latin such as
//! `Ｐｙｔｈｏｎ` is emitted as the token `Python`.

use lindera::tokenizer::{Tokenizer as LinderaTokenizer, TokenizerConfig as LinderaConfig};
use regex::Regex;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

/// A deterministic text → token sequence facility.
///
/// Implementations must return the same sequence for the same input.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

fn normalize_text(input: &str) -> String {
    input.nfkc().collect::<String>()
}

/// Default tokenizer: lindera when available, [`FallbackTokenizer`] otherwise.
#[derive(Debug)]
pub struct LexicalMatcher {
    lindera: Option<LinderaAdapter>,
    fallback: FallbackTokenizer,
}

impl LexicalMatcher {
    #[must_use]
    pub fn new() -> Self {
        let lindera = LinderaAdapter::new();
        if lindera.is_none() {
            warn!("lindera dictionary unavailable; using fallback word splitter");
        }
        Self {
            lindera,
            fallback: FallbackTokenizer::new(),
        }
    }
}

impl Default for LexicalMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenize for LexicalMatcher {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = normalize_text(text);
        if let Some(adapter) = &self.lindera
            && let Some(tokens) = adapter.tokenize(&normalized)
            && !tokens.is_empty()
        {
            return tokens;
        }
        self.fallback.split(&normalized)
    }
}

/// Splits on whitespace and any non letter/number run.
///
/// Japanese runs come out as single long tokens, so this only helps for
/// Latin-script terms.
#[derive(Debug)]
pub struct FallbackTokenizer {
    word_re: Regex,
}

impl FallbackTokenizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            word_re: Regex::new(r"[^\p{L}\p{N}]+").expect("compile fallback regex"),
        }
    }

    fn split(&self, normalized: &str) -> Vec<String> {
        normalized
            .split(char::is_whitespace)
            .flat_map(|piece| self.word_re.split(piece))
            .filter(|token| !token.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl Default for FallbackTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenize for FallbackTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.split(&normalize_text(text))
    }
}

struct LinderaAdapter {
    tokenizer: LinderaTokenizer,
}

impl LinderaAdapter {
    fn new() -> Option<Self> {
        let config = LinderaConfig::default();
        LinderaTokenizer::from_config(config)
            .ok()
            .map(|tokenizer| Self { tokenizer })
    }

    fn tokenize(&self, text: &str) -> Option<Vec<String>> {
        let tokens = self.tokenizer.tokenize(text).ok()?;
        let results: Vec<String> = tokens
            .iter()
            .map(|token| token.get_text().trim())
            .filter(|surface| !surface.is_empty())
            .map(ToString::to_string)
            .collect();
        if results.is_empty() { None } else { Some(results) }
    }
}

impl std::fmt::Debug for LinderaAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinderaAdapter").finish()
    }
}
