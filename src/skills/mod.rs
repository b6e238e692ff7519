//! Skill dictionary and the bilingual skill extractor.
//!
//! The dictionary maps category names to ordered term lists and is loaded once
//! at startup from a JSON or YAML document:
//!
//! ```json
//! {
//!   "Languages": ["Python", "Rust", "Go"],
//!   "AI": ["機械学習", "深層学習", "LLM"]
//! }
//! ```
//!
//! [`SkillExtractor`] finds which terms occur in a text. A term counts as found
//! when it is a literal substring of the text or when it is an exact token in
//! the text's word segmentation. The token prong catches terms the substring
//! prong misses, e.g. full-width `Ｒｕｓｔ` normalizing to `Rust`.

pub mod tokenizer;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::DictionaryError;
pub use tokenizer::{FallbackTokenizer, LexicalMatcher, Tokenize};

/// One named group of skill terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCategory {
    pub name: String,
    pub terms: Vec<String>,
}

/// Immutable bilingual skill vocabulary, in source-document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillDictionary {
    categories: Vec<SkillCategory>,
}

impl SkillDictionary {
    /// Build a dictionary from `(category, terms)` pairs.
    ///
    /// Blank terms are dropped and repeated terms within one category keep
    /// their first position. The same term may still appear under several
    /// categories.
    pub fn from_pairs<C, T, S>(pairs: impl IntoIterator<Item = (C, T)>) -> Self
    where
        C: Into<String>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = pairs
            .into_iter()
            .map(|(name, terms)| {
                let mut seen = HashSet::new();
                let terms = terms
                    .into_iter()
                    .map(Into::into)
                    .filter(|term: &String| !term.trim().is_empty())
                    .filter(|term| seen.insert(term.clone()))
                    .collect();
                SkillCategory {
                    name: name.into(),
                    terms,
                }
            })
            .collect();
        Self { categories }
    }

    /// Parse a JSON object of `category -> [term, ...]`, keeping key order.
    pub fn from_json_str(source: &str) -> Result<Self, DictionaryError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(source)?;
        let mut pairs = Vec::with_capacity(map.len());
        for (name, value) in map {
            let terms: Vec<String> = serde_json::from_value(value)
                .map_err(|_| DictionaryError::Category(name.clone()))?;
            pairs.push((name, terms));
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Parse a YAML mapping of `category -> [term, ...]`, keeping key order.
    pub fn from_yaml_str(source: &str) -> Result<Self, DictionaryError> {
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(source)?;
        let mut pairs = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = key
                .as_str()
                .map(ToString::to_string)
                .ok_or_else(|| DictionaryError::Category(format!("{key:?}")))?;
            let terms: Vec<String> = serde_yaml::from_value(value)
                .map_err(|_| DictionaryError::Category(name.clone()))?;
            pairs.push((name, terms));
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Load a dictionary file. `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let dictionary = if is_yaml {
            Self::from_yaml_str(&source)?
        } else {
            Self::from_json_str(&source)?
        };
        info!(
            categories = dictionary.categories.len(),
            terms = dictionary.len(),
            "Loaded skill dictionary"
        );
        Ok(dictionary)
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    /// Every term in category order, including cross-category repeats.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|category| category.terms.iter().map(String::as_str))
    }

    /// Name of the first category listing `term`.
    pub fn category_of(&self, term: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.terms.iter().any(|t| t == term))
            .map(|category| category.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.terms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Knobs for the substring prong of matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare lowercased term against lowercased text. Token matching stays
    /// exact either way.
    pub case_insensitive: bool,
}

/// Finds dictionary terms in free text.
///
/// Owns the dictionary and the tokenizer; build one at startup and share it
/// by reference.
pub struct SkillExtractor {
    dictionary: SkillDictionary,
    tokenizer: Box<dyn Tokenize>,
    options: MatchOptions,
}

impl SkillExtractor {
    pub fn new(dictionary: SkillDictionary, tokenizer: Box<dyn Tokenize>) -> Self {
        Self {
            dictionary,
            tokenizer,
            options: MatchOptions::default(),
        }
    }

    /// Extractor backed by the lindera-based [`LexicalMatcher`].
    pub fn with_lexical_matcher(dictionary: SkillDictionary) -> Self {
        Self::new(dictionary, Box::new(LexicalMatcher::new()))
    }

    #[must_use]
    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dictionary(&self) -> &SkillDictionary {
        &self.dictionary
    }

    /// Terms present in `text`, each at most once, in dictionary order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let tokens: HashSet<String> = self.tokenizer.tokenize(text).into_iter().collect();
        let lowered = self.options.case_insensitive.then(|| text.to_lowercase());

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for term in self.dictionary.terms() {
            if seen.contains(term) {
                continue;
            }
            let literal = match &lowered {
                Some(lower_text) => lower_text.contains(&term.to_lowercase()),
                None => text.contains(term),
            };
            if literal || tokens.contains(term) {
                seen.insert(term);
                found.push(term.to_string());
            }
        }
        debug!(tokens = tokens.len(), found = found.len(), "Extracted skills");
        found
    }
}

impl std::fmt::Debug for SkillExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillExtractor")
            .field("dictionary", &self.dictionary)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Tokenizer with a fixed answer, to exercise the token prong alone.
    struct FixedTokens(Vec<&'static str>);

    impl Tokenize for FixedTokens {
        fn tokenize(&self, _text: &str) -> Vec<String> {
            self.0.iter().map(ToString::to_string).collect()
        }
    }

    fn dictionary() -> SkillDictionary {
        SkillDictionary::from_pairs([
            ("Languages", vec!["Python", "Rust", "Go"]),
            ("AI", vec!["機械学習", "LLM"]),
            ("Infra", vec!["Kubernetes", "Rust"]),
        ])
    }

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(dictionary(), Box::new(FallbackTokenizer::new()))
    }

    #[test]
    fn test_substring_match() {
        let found = extractor().extract("I love Python programming");
        assert_eq!(found, vec!["Python"]);
    }

    #[test]
    fn test_substring_match_inside_japanese_compound() {
        let found = extractor().extract("最近は機械学習基盤をKubernetesで運用している");
        assert_eq!(found, vec!["機械学習", "Kubernetes"]);
    }

    #[test]
    fn test_token_only_match_is_included() {
        let extractor = SkillExtractor::new(dictionary(), Box::new(FixedTokens(vec!["機械学習"])));
        // The literal term is absent; only the token stream carries it.
        let found = extractor.extract("きかいがくしゅう");
        assert_eq!(found, vec!["機械学習"]);
    }

    #[test]
    fn test_full_width_latin_matches_through_tokens() {
        let found = extractor().extract("Ｒｕｓｔ 入門");
        assert_eq!(found, vec!["Rust"]);
    }

    #[test]
    fn test_term_found_by_both_prongs_appears_once() {
        let found = extractor().extract("Rust Rust Rust");
        assert_eq!(found, vec!["Rust"]);
    }

    #[test]
    fn test_term_in_two_categories_appears_once() {
        let found = extractor().extract("Kubernetes operators in Rust");
        assert_eq!(found, vec!["Rust", "Kubernetes"]);
    }

    #[test]
    fn test_matching_is_case_sensitive_by_default() {
        assert!(extractor().extract("python and rust").is_empty());
    }

    #[test]
    fn test_case_insensitive_option() {
        let found = extractor()
            .with_options(MatchOptions {
                case_insensitive: true,
            })
            .extract("python and rust");
        assert_eq!(found, vec!["Python", "Rust"]);
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   ").is_empty());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let extractor = extractor();
        let text = "Go と Rust と LLM の話";
        let first = extractor.extract(text);
        for _ in 0..5 {
            assert_eq!(extractor.extract(text), first);
        }
    }

    #[test]
    fn test_from_pairs_drops_blank_and_repeated_terms() {
        let dict = SkillDictionary::from_pairs([("Langs", vec!["Go", "", "  ", "Go", "Rust"])]);
        assert_eq!(dict.categories()[0].terms, vec!["Go", "Rust"]);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_from_json_preserves_category_order() {
        let dict = SkillDictionary::from_json_str(
            r#"{"Zeta": ["Z"], "Alpha": ["A", "B"], "Mid": []}"#,
        )
        .unwrap();
        let names: Vec<&str> = dict.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(dict.terms().collect::<Vec<_>>(), vec!["Z", "A", "B"]);
    }

    #[test]
    fn test_from_json_rejects_non_list_category() {
        let err = SkillDictionary::from_json_str(r#"{"Langs": "Python"}"#).unwrap_err();
        assert!(matches!(err, DictionaryError::Category(name) if name == "Langs"));
    }

    #[test]
    fn test_from_json_rejects_malformed_document() {
        let err = SkillDictionary::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, DictionaryError::Json(_)));
    }

    #[test]
    fn test_from_yaml() {
        let dict = SkillDictionary::from_yaml_str("Cloud:\n  - AWS\n  - GCP\nAI:\n  - 生成AI\n").unwrap();
        assert_eq!(dict.category_of("生成AI"), Some("AI"));
        assert_eq!(dict.terms().collect::<Vec<_>>(), vec!["AWS", "GCP", "生成AI"]);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"Languages": ["TypeScript", "Rust"]}}"#).unwrap();
        let dict = SkillDictionary::load(file.path()).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.category_of("Rust"), Some("Languages"));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "DB:\n  - PostgreSQL").unwrap();
        let dict = SkillDictionary::load(file.path()).unwrap();
        assert_eq!(dict.terms().collect::<Vec<_>>(), vec!["PostgreSQL"]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SkillDictionary::load("/definitely/not/here/skills.json").unwrap_err();
        assert!(matches!(err, DictionaryError::Io { .. }));
    }

    #[test]
    fn test_category_of_uses_first_category() {
        assert_eq!(dictionary().category_of("Rust"), Some("Languages"));
        assert_eq!(dictionary().category_of("COBOL"), None);
    }
}
