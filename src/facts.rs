//! Heuristic extraction of fact-bearing sentences.
//!
//! A sentence counts as a fact when it carries at least two independent signals
//! among numbers, dates, percentages, money amounts and quoted speech.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::config::{
    SynthesisConfig, DEFAULT_MAX_FACTS_PER_ARTICLE, DEFAULT_MIN_FACT_SCORE,
    DEFAULT_MIN_SENTENCE_CHARS,
};

lazy_static! {
    static ref SENTENCE_BREAK_RE: Regex = Regex::new(r"[.!?]+").expect("valid sentence pattern");
    static ref NUMBER_RE: Regex = Regex::new(r"\d+").expect("valid number pattern");
    // Either a DD/MM/YYYY style date or a bare year. A year inside a full date matches
    // both alternatives, which is harmless since the predicate is boolean.
    static ref DATE_RE: Regex =
        Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-](?:19|20)\d{2}\b|\b(?:19|20)\d{2}\b")
            .expect("valid date pattern");
    static ref PERCENTAGE_RE: Regex =
        Regex::new(r"(?i)\d+%|\d+\s*por\s*ciento").expect("valid percentage pattern");
    static ref MONEY_RE: Regex =
        Regex::new(r"(?i)\$[\d,]+|\d+\s*(?:pesos|dólares|euros|millones|miles)")
            .expect("valid money pattern");
    // Quotes pair by kind so apostrophes inside names never count
    static ref QUOTE_RE: Regex =
        Regex::new(r#""[^"]*"|“[^”]*”|‘[^’]*’"#).expect("valid quote pattern");
}

pub fn has_number(sentence: &str) -> bool {
    NUMBER_RE.is_match(sentence)
}

pub fn has_date(sentence: &str) -> bool {
    DATE_RE.is_match(sentence)
}

pub fn has_percentage(sentence: &str) -> bool {
    PERCENTAGE_RE.is_match(sentence)
}

pub fn has_money(sentence: &str) -> bool {
    MONEY_RE.is_match(sentence)
}

pub fn has_quote(sentence: &str) -> bool {
    QUOTE_RE.is_match(sentence)
}

/// Which fact signals a sentence carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FactSignals {
    pub number: bool,
    pub date: bool,
    pub percentage: bool,
    pub money: bool,
    pub quote: bool,
}

impl FactSignals {
    pub fn detect(sentence: &str) -> Self {
        Self {
            number: has_number(sentence),
            date: has_date(sentence),
            percentage: has_percentage(sentence),
            money: has_money(sentence),
            quote: has_quote(sentence),
        }
    }

    /// Number of signal families present.
    pub fn score(&self) -> u32 {
        [self.number, self.date, self.percentage, self.money, self.quote]
            .iter()
            .filter(|&&s| s)
            .count() as u32
    }
}

/// A sentence retained as a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub text: String,
    pub score: u32,
    pub has_number: bool,
    pub has_date: bool,
}

impl Fact {
    fn from_sentence(sentence: &str, signals: FactSignals) -> Self {
        Fact {
            text: sentence.to_string(),
            score: signals.score(),
            has_number: signals.number,
            has_date: signals.date,
        }
    }
}

/// Splits text into sentences and keeps the ones carrying the most fact signals.
#[derive(Debug, Clone)]
pub struct FactExtractor {
    min_score: u32,
    min_sentence_chars: usize,
    max_facts: usize,
}

impl Default for FactExtractor {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_FACT_SCORE,
            min_sentence_chars: DEFAULT_MIN_SENTENCE_CHARS,
            max_facts: DEFAULT_MAX_FACTS_PER_ARTICLE,
        }
    }
}

impl FactExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self {
            min_score: config.min_fact_score,
            min_sentence_chars: config.min_sentence_chars,
            max_facts: config.max_facts_per_article,
        }
    }

    /// Trimmed sentences long enough to be considered.
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        SENTENCE_BREAK_RE
            .split(text)
            .map(str::trim)
            .filter(|s| s.chars().count() >= self.min_sentence_chars)
            .collect()
    }

    /// Every candidate sentence with its signals, in text order.
    pub fn score_sentences(&self, text: &str) -> Vec<(Fact, FactSignals)> {
        self.sentences(text)
            .into_iter()
            .map(|sentence| {
                let signals = FactSignals::detect(sentence);
                (Fact::from_sentence(sentence, signals), signals)
            })
            .collect()
    }

    /// Qualifying facts, highest score first. Equal scores keep text order.
    pub fn facts(&self, text: &str) -> Vec<Fact> {
        let mut facts: Vec<Fact> = self
            .score_sentences(text)
            .into_iter()
            .map(|(fact, _)| fact)
            .filter(|fact| fact.score >= self.min_score)
            .collect();

        facts.sort_by(|a, b| b.score.cmp(&a.score));
        facts.truncate(self.max_facts);
        facts
    }

    /// Text of the qualifying facts, highest score first.
    pub fn extract_facts(&self, text: &str) -> Vec<String> {
        self.facts(text).into_iter().map(|f| f.text).collect()
    }
}

/// Fact sentences of `text` under the default heuristics.
pub fn extract_facts(text: &str) -> Vec<String> {
    FactExtractor::new().extract_facts(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_predicates() {
        assert!(has_number("Hubo 45 heridos"));
        assert!(!has_number("Hubo muchos heridos"));

        assert!(has_date("Ocurrió el 12/03/2024 por la tarde"));
        assert!(has_date("Ocurrió en 1998"));
        assert!(!has_date("Código 3050 activado"));

        assert!(has_percentage("Creció 12% este año"));
        assert!(has_percentage("Creció 12 POR CIENTO"));
        assert!(!has_percentage("Creció doce puntos"));

        assert!(has_money("Costó $1,500"));
        assert!(has_money("Invirtió 300 millones"));
        assert!(has_money("Recibió 20 Dólares"));
        assert!(!has_money("Recibió 20 aplausos"));

        assert!(has_quote(r#"Dijo "basta" y se fue"#));
        assert!(has_quote("Dijo “basta” y se fue"));
        assert!(!has_quote("Dijo basta y se fue"));
        assert!(has_quote("Respondió ‘no’ sin más"));
        assert!(!has_quote("O'Higgins recibió a d'Artagnan en 1810"));
    }

    #[test]
    fn test_signal_score() {
        let signals = FactSignals::detect("La empresa invirtió $500 millones en 2024 y creció 12%");
        assert_eq!(
            signals,
            FactSignals {
                number: true,
                date: true,
                percentage: true,
                money: true,
                quote: false,
            }
        );
        assert_eq!(signals.score(), 4);
    }

    #[test]
    fn test_year_and_percentage_sentence_is_a_fact() {
        let facts = extract_facts("En 2026 el crecimiento fue de 3.5%.");
        // The decimal point also ends a sentence
        assert_eq!(facts, vec!["En 2026 el crecimiento fue de 3"]);
    }

    #[test]
    fn test_plain_sentence_is_not_a_fact() {
        assert!(extract_facts("El gobierno presentó un plan ambicioso para las empresas.").is_empty());
        assert!(extract_facts("").is_empty());
    }

    #[test]
    fn test_short_fragments_discarded() {
        assert!(extract_facts("En 2024: 5%. Ok!").is_empty());
    }

    #[test]
    fn test_ordering_and_cap() {
        let text = "Se reportaron 40 casos en 2020 según datos oficiales. \
            La empresa invirtió $500 millones en 2024 y creció 12% según el reporte anual. \
            El ministro dijo \"vamos a crecer\" en 2025 ante la prensa. \
            Frase uno con 10 casos en 2011 registrados. \
            Frase dos con 11 casos en 2012 registrados. \
            Frase tres con 12 casos en 2013 registrados. \
            Frase cuatro con 13 casos en 2014 registrados.";
        let facts = FactExtractor::new().facts(text);

        assert_eq!(facts.len(), 5);
        assert_eq!(
            facts[0].text,
            "La empresa invirtió $500 millones en 2024 y creció 12% según el reporte anual"
        );
        assert_eq!(facts[0].score, 4);
        assert_eq!(facts[1].text, "El ministro dijo \"vamos a crecer\" en 2025 ante la prensa");
        assert_eq!(facts[1].score, 3);
        assert_eq!(facts[2].text, "Se reportaron 40 casos en 2020 según datos oficiales");
        assert!(facts[2].has_number && facts[2].has_date);
        assert_eq!(facts[4].text, "Frase dos con 11 casos en 2012 registrados");
    }
}
