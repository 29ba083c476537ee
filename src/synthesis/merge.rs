use tracing::debug;

use super::dedup::FactDeduplicator;
use crate::article::{RawArticle, SourceRef, SynthesisMethod, SynthesizedArticle};
use crate::config::SynthesisConfig;
use crate::facts::FactExtractor;
use crate::similarity::similarity;
use crate::TARGET_SYNTHESIS;

/// Merges a cluster of reports into one article built on its richest member.
pub struct ArticleSynthesizer {
    extractor: FactExtractor,
    deduplicator: FactDeduplicator,
    additional_fact_threshold: f64,
    max_additional_facts: usize,
    max_source_refs: usize,
}

impl Default for ArticleSynthesizer {
    fn default() -> Self {
        Self::from_config(&SynthesisConfig::default())
    }
}

impl ArticleSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self {
            extractor: FactExtractor::from_config(config),
            deduplicator: FactDeduplicator::new(config.fact_dedup_threshold),
            additional_fact_threshold: config.additional_fact_threshold,
            max_additional_facts: config.max_additional_facts,
            max_source_refs: config.max_source_refs,
        }
    }

    /// Builds the synthesized article for `cluster`, or `None` for an empty cluster.
    ///
    /// The member with the longest description is the base; ties go to the earliest.
    /// Its description is extended with up to `max_additional_facts` of the leading
    /// deduplicated facts that the base description does not already cover.
    pub fn synthesize(&self, cluster: &[&RawArticle]) -> Option<SynthesizedArticle> {
        let base = base_article(cluster)?;

        let unique_facts = self.collect_facts(cluster);

        let additional_facts: Vec<&str> = unique_facts
            .iter()
            .take(self.max_additional_facts)
            .filter(|fact| similarity(fact, &base.description) < self.additional_fact_threshold)
            .map(String::as_str)
            .collect();

        let mut description = base.description.clone();
        if !additional_facts.is_empty() {
            description.push(' ');
            description.push_str(&additional_facts.join(" "));
        }

        debug!(
            target: TARGET_SYNTHESIS,
            "Synthesized '{}' from {} articles: {} unique facts, {} appended",
            base.title,
            cluster.len(),
            unique_facts.len(),
            additional_facts.len()
        );

        Some(SynthesizedArticle {
            title: base.title.clone(),
            description,
            content: base.content_or_empty().to_string(),
            url: base.url.clone().unwrap_or_default(),
            image_url: base.image_url.clone().unwrap_or_default(),
            published_at: base.published_at.clone().unwrap_or_default(),
            sources_count: cluster.len(),
            source_names: source_names(cluster),
            synthesis_method: SynthesisMethod::Synthesized,
            facts_extracted: unique_facts.len(),
            original_articles: cluster
                .iter()
                .take(self.max_source_refs)
                .map(|a| SourceRef::from(*a))
                .collect(),
        })
    }

    /// Facts from every member, member order then score order, near-duplicates removed.
    pub fn collect_facts(&self, cluster: &[&RawArticle]) -> Vec<String> {
        let all_facts = cluster
            .iter()
            .flat_map(|article| self.extractor.extract_facts(&article.combined_text()));
        self.deduplicator.dedup(all_facts)
    }
}

/// Member with the longest description, counted in characters.
pub fn base_article<'a>(cluster: &[&'a RawArticle]) -> Option<&'a RawArticle> {
    let mut best: Option<(&RawArticle, usize)> = None;
    for &article in cluster {
        let len = article.description.chars().count();
        match best {
            Some((_, best_len)) if len <= best_len => {}
            _ => best = Some((article, len)),
        }
    }
    best.map(|(article, _)| article)
}

/// Distinct outlet names in order of first appearance.
fn source_names(cluster: &[&RawArticle]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for article in cluster {
        if !names.contains(&article.source_name) {
            names.push(article.source_name.clone());
        }
    }
    names
}
