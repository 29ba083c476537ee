use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};

use crate::config::DEFAULT_KEYWORD_TOP_N;

lazy_static! {
    // Words of four or more letters, Spanish accents included
    static ref WORD_RE: Regex =
        Regex::new(r"\b[a-zA-ZáéíóúÁÉÍÓÚñÑ]{4,}\b").expect("keyword pattern is valid");

    static ref SPANISH_STOPWORDS: HashSet<&'static str> = [
        "el", "la", "los", "las", "un", "una", "unos", "unas",
        "y", "o", "pero", "sin", "con", "por", "para", "de", "del",
        "al", "en", "a", "ante", "bajo", "desde", "hasta", "hacia",
        "sobre", "entre", "durante", "mediante", "según", "tras",
        "que", "como", "cuando", "donde", "quien", "cuyo", "cuya",
        "este", "esta", "estos", "estas", "ese", "esa", "esos", "esas",
        "aquel", "aquella", "aquellos", "aquellas", "mi", "tu", "su",
        "nuestro", "vuestro", "suyo", "mío", "tuyo",
        "es", "son", "fue", "fueron", "era", "eran", "será", "serán",
        "ha", "han", "había", "habían", "habrá", "habrán",
        "está", "están", "estaba", "estaban", "estará", "estarán",
        "tiene", "tienen", "tenía", "tenían", "tendrá", "tendrán",
    ]
    .into_iter()
    .collect();
}

pub fn is_stopword(word: &str) -> bool {
    SPANISH_STOPWORDS.contains(word)
}

/// Pulls ranked content words out of Spanish text.
pub struct KeywordExtractor {
    top_n: usize,
    stemmer: Option<Stemmer>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_KEYWORD_TOP_N,
            stemmer: None,
        }
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Reduce keywords to their Snowball Spanish stems so inflections compare equal.
    pub fn with_stemming(mut self, enabled: bool) -> Self {
        self.stemmer = enabled.then(|| Stemmer::create(Algorithm::Spanish));
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Most frequent content words of `text`, most frequent first.
    ///
    /// Ties keep the order in which the words first appear, so the result is
    /// deterministic for a given input.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        let mut order: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for token in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
            if is_stopword(token) {
                continue;
            }
            let word = match &self.stemmer {
                Some(stemmer) => stemmer.stem(token).into_owned(),
                None => token.to_string(),
            };
            match positions.get(&word) {
                Some(&idx) => order[idx].1 += 1,
                None => {
                    positions.insert(word.clone(), order.len());
                    order.push((word, 1));
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order
            .into_iter()
            .take(self.top_n)
            .map(|(word, _)| word)
            .collect()
    }

    /// Keyword set for similarity comparisons.
    pub fn keyword_set(&self, text: &str) -> HashSet<String> {
        self.extract_keywords(text).into_iter().collect()
    }
}

/// Top `top_n` keywords of `text` with the default extractor settings.
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    KeywordExtractor::new().with_top_n(top_n).extract_keywords(text)
}
