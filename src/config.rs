use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::TARGET_CONFIG;

/// Minimum combined score for two articles to land in the same cluster
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.6;
/// Weight of keyword overlap in the combined score
pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.6;
/// Weight of raw title similarity in the combined score
pub const DEFAULT_TITLE_WEIGHT: f64 = 0.4;
pub const DEFAULT_KEYWORD_TOP_N: usize = 10;
/// Facts more similar than this to an accepted fact are dropped
pub const DEFAULT_FACT_DEDUP_THRESHOLD: f64 = 0.7;
/// Facts at least this similar to the base description add nothing new
pub const DEFAULT_ADDITIONAL_FACT_THRESHOLD: f64 = 0.5;
pub const DEFAULT_MAX_ADDITIONAL_FACTS: usize = 3;
pub const DEFAULT_MIN_FACT_SCORE: u32 = 2;
/// Sentences shorter than this (in characters) are never facts
pub const DEFAULT_MIN_SENTENCE_CHARS: usize = 20;
pub const DEFAULT_MAX_FACTS_PER_ARTICLE: usize = 5;
pub const DEFAULT_MAX_SOURCE_REFS: usize = 3;

/// Text fed to the keyword extractor when comparing two articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordScope {
    #[default]
    Title,
    TitleAndDescription,
}

impl FromStr for KeywordScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "title" => Ok(KeywordScope::Title),
            "title_and_description" | "full" => Ok(KeywordScope::TitleAndDescription),
            other => Err(anyhow::anyhow!("Unknown keyword scope: {}", other)),
        }
    }
}

/// Character-level metric used for the raw title component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleMetric {
    #[default]
    SequenceRatio,
    JaroWinkler,
    NormalizedLevenshtein,
}

impl FromStr for TitleMetric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sequence_ratio" | "sequence" => Ok(TitleMetric::SequenceRatio),
            "jaro_winkler" => Ok(TitleMetric::JaroWinkler),
            "normalized_levenshtein" | "levenshtein" => Ok(TitleMetric::NormalizedLevenshtein),
            other => Err(anyhow::anyhow!("Unknown title metric: {}", other)),
        }
    }
}

/// Tunable constants for clustering and synthesis.
///
/// `Default` reproduces the reference heuristics. Every field can be overridden with a
/// `with_*` builder, from a JSON file, or from `NEWSFUSE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub cluster_threshold: f64,
    pub keyword_weight: f64,
    pub title_weight: f64,
    pub keyword_top_n: usize,
    pub keyword_scope: KeywordScope,
    pub stem_keywords: bool,
    pub title_metric: TitleMetric,
    pub fact_dedup_threshold: f64,
    pub additional_fact_threshold: f64,
    pub max_additional_facts: usize,
    pub min_fact_score: u32,
    pub min_sentence_chars: usize,
    pub max_facts_per_article: usize,
    pub max_source_refs: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            cluster_threshold: DEFAULT_CLUSTER_THRESHOLD,
            keyword_weight: DEFAULT_KEYWORD_WEIGHT,
            title_weight: DEFAULT_TITLE_WEIGHT,
            keyword_top_n: DEFAULT_KEYWORD_TOP_N,
            keyword_scope: KeywordScope::Title,
            stem_keywords: false,
            title_metric: TitleMetric::SequenceRatio,
            fact_dedup_threshold: DEFAULT_FACT_DEDUP_THRESHOLD,
            additional_fact_threshold: DEFAULT_ADDITIONAL_FACT_THRESHOLD,
            max_additional_facts: DEFAULT_MAX_ADDITIONAL_FACTS,
            min_fact_score: DEFAULT_MIN_FACT_SCORE,
            min_sentence_chars: DEFAULT_MIN_SENTENCE_CHARS,
            max_facts_per_article: DEFAULT_MAX_FACTS_PER_ARTICLE,
            max_source_refs: DEFAULT_MAX_SOURCE_REFS,
        }
    }
}

impl SynthesisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.cluster_threshold = threshold;
        self
    }

    pub fn with_weights(mut self, keyword_weight: f64, title_weight: f64) -> Self {
        self.keyword_weight = keyword_weight;
        self.title_weight = title_weight;
        self
    }

    pub fn with_keyword_top_n(mut self, top_n: usize) -> Self {
        self.keyword_top_n = top_n;
        self
    }

    pub fn with_keyword_scope(mut self, scope: KeywordScope) -> Self {
        self.keyword_scope = scope;
        self
    }

    pub fn with_stemming(mut self, enabled: bool) -> Self {
        self.stem_keywords = enabled;
        self
    }

    pub fn with_title_metric(mut self, metric: TitleMetric) -> Self {
        self.title_metric = metric;
        self
    }

    pub fn with_fact_dedup_threshold(mut self, threshold: f64) -> Self {
        self.fact_dedup_threshold = threshold;
        self
    }

    pub fn with_additional_fact_threshold(mut self, threshold: f64) -> Self {
        self.additional_fact_threshold = threshold;
        self
    }

    /// Loads a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SynthesisConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(target: TARGET_CONFIG, "Loaded synthesis config from {}", path.display());
        Ok(config)
    }

    /// Defaults overlaid with any `NEWSFUSE_*` environment variables that are set.
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Applies `NEWSFUSE_*` environment variables on top of `self`.
    pub fn overlay_env(mut self) -> Self {
        env_override("NEWSFUSE_CLUSTER_THRESHOLD", &mut self.cluster_threshold);
        env_override("NEWSFUSE_KEYWORD_WEIGHT", &mut self.keyword_weight);
        env_override("NEWSFUSE_TITLE_WEIGHT", &mut self.title_weight);
        env_override("NEWSFUSE_KEYWORD_TOP_N", &mut self.keyword_top_n);
        env_override("NEWSFUSE_KEYWORD_SCOPE", &mut self.keyword_scope);
        env_override("NEWSFUSE_STEM_KEYWORDS", &mut self.stem_keywords);
        env_override("NEWSFUSE_TITLE_METRIC", &mut self.title_metric);
        env_override("NEWSFUSE_FACT_DEDUP_THRESHOLD", &mut self.fact_dedup_threshold);
        env_override(
            "NEWSFUSE_ADDITIONAL_FACT_THRESHOLD",
            &mut self.additional_fact_threshold,
        );
        env_override("NEWSFUSE_MAX_ADDITIONAL_FACTS", &mut self.max_additional_facts);
        env_override("NEWSFUSE_MIN_FACT_SCORE", &mut self.min_fact_score);
        env_override("NEWSFUSE_MIN_SENTENCE_CHARS", &mut self.min_sentence_chars);
        env_override("NEWSFUSE_MAX_FACTS_PER_ARTICLE", &mut self.max_facts_per_article);
        env_override("NEWSFUSE_MAX_SOURCE_REFS", &mut self.max_source_refs);
        self
    }
}

fn env_override<T>(var: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(var) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(err) => warn!(
            target: TARGET_CONFIG,
            "Ignoring {}={:?}: {}", var, raw, err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_heuristics() {
        let config = SynthesisConfig::default();
        assert_eq!(config.cluster_threshold, 0.6);
        assert_eq!(config.keyword_weight, 0.6);
        assert_eq!(config.title_weight, 0.4);
        assert_eq!(config.fact_dedup_threshold, 0.7);
        assert_eq!(config.additional_fact_threshold, 0.5);
        assert_eq!(config.min_fact_score, 2);
        assert_eq!(config.keyword_scope, KeywordScope::Title);
        assert!(!config.stem_keywords);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SynthesisConfig =
            serde_json::from_str(r#"{"cluster_threshold": 0.3, "keyword_scope": "title_and_description"}"#)
                .unwrap();
        assert_eq!(config.cluster_threshold, 0.3);
        assert_eq!(config.keyword_scope, KeywordScope::TitleAndDescription);
        assert_eq!(config.keyword_top_n, DEFAULT_KEYWORD_TOP_N);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("title".parse::<KeywordScope>().unwrap(), KeywordScope::Title);
        assert_eq!(
            "title-and-description".parse::<KeywordScope>().unwrap(),
            KeywordScope::TitleAndDescription
        );
        assert_eq!("jaro_winkler".parse::<TitleMetric>().unwrap(), TitleMetric::JaroWinkler);
        assert!("cosine".parse::<TitleMetric>().is_err());
    }

    #[test]
    fn test_env_overlay() {
        env::set_var("NEWSFUSE_MAX_ADDITIONAL_FACTS", "1");
        env::set_var("NEWSFUSE_MIN_FACT_SCORE", "not-a-number");
        let config = SynthesisConfig::from_env();
        env::remove_var("NEWSFUSE_MAX_ADDITIONAL_FACTS");
        env::remove_var("NEWSFUSE_MIN_FACT_SCORE");

        assert_eq!(config.max_additional_facts, 1);
        assert_eq!(config.min_fact_score, DEFAULT_MIN_FACT_SCORE);
    }

    #[test]
    fn test_env_overlay_covers_fact_and_provenance_limits() {
        env::set_var("NEWSFUSE_MIN_SENTENCE_CHARS", "12");
        env::set_var("NEWSFUSE_MAX_FACTS_PER_ARTICLE", "2");
        env::set_var("NEWSFUSE_MAX_SOURCE_REFS", "5");
        let config = SynthesisConfig::default().overlay_env();
        env::remove_var("NEWSFUSE_MIN_SENTENCE_CHARS");
        env::remove_var("NEWSFUSE_MAX_FACTS_PER_ARTICLE");
        env::remove_var("NEWSFUSE_MAX_SOURCE_REFS");

        assert_eq!(config.min_sentence_chars, 12);
        assert_eq!(config.max_facts_per_article, 2);
        assert_eq!(config.max_source_refs, 5);
    }
}
