//! Word classification: reserved keyword, internationalized alias, or name.

use std::collections::HashMap;

use super::Keyword;

/// Result of classifying a bare word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Keyword(Keyword),
    Name,
}

/// Decides whether a bare word is a keyword or a name.
///
/// Implementations are shared read-only between concurrent parses.
pub trait KeywordClassifier: Send + Sync {
    fn classify(&self, word: &str) -> WordClass;
}

/// The built-in ECSQL keyword table. Only reserved keywords classify as
/// keywords; contextual ones are left to the parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlKeywords;

impl KeywordClassifier for SqlKeywords {
    fn classify(&self, word: &str) -> WordClass {
        match Keyword::from_str(word) {
            Some(keyword) if keyword.is_reserved() => WordClass::Keyword(keyword),
            _ => WordClass::Name,
        }
    }
}

/// Alternative spellings for keywords, consulted before [`SqlKeywords`].
///
/// ```
/// use ecsql_parser::lexer::{Keyword, KeywordAliases, KeywordClassifier, WordClass};
///
/// let aliases = KeywordAliases::new().with_alias("WIE", Keyword::Like);
/// assert_eq!(aliases.classify("wie"), WordClass::Keyword(Keyword::Like));
/// assert_eq!(aliases.classify("select"), WordClass::Keyword(Keyword::Select));
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeywordAliases {
    aliases: HashMap<String, Keyword>,
}

impl KeywordAliases {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spelling` (case-insensitive) as an alias of `keyword`.
    #[must_use]
    pub fn with_alias(mut self, spelling: &str, keyword: Keyword) -> Self {
        self.aliases.insert(spelling.to_ascii_uppercase(), keyword);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl KeywordClassifier for KeywordAliases {
    fn classify(&self, word: &str) -> WordClass {
        self.aliases
            .get(&word.to_ascii_uppercase())
            .map_or_else(|| SqlKeywords.classify(word), |kw| WordClass::Keyword(*kw))
    }
}
