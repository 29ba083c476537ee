use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::merge::ArticleSynthesizer;
use crate::article::{OutputArticle, PassthroughArticle, RawArticle};
use crate::clustering::find_similar_articles;
use crate::config::SynthesisConfig;
use crate::similarity::SimilarityScorer;
use crate::TARGET_SYNTHESIS;

/// Batch-level counters for the caller's logs and telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisStats {
    pub total_input: usize,
    pub groups_found: usize,
    // Number of output entries, merged and passed through
    pub synthesized: usize,
    pub compression_ratio: f64,
}

impl SynthesisStats {
    fn new(total_input: usize, groups_found: usize, synthesized: usize) -> Self {
        Self {
            total_input,
            groups_found,
            synthesized,
            compression_ratio: synthesized as f64 / total_input.max(1) as f64,
        }
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub articles: Vec<OutputArticle>,
    pub stats: SynthesisStats,
}

impl SynthesisReport {
    pub fn into_parts(self) -> (Vec<OutputArticle>, SynthesisStats) {
        (self.articles, self.stats)
    }
}

/// Clusters a batch and emits one entry per logical article.
pub struct SynthesisPipeline {
    scorer: SimilarityScorer,
    synthesizer: ArticleSynthesizer,
    threshold: f64,
}

impl Default for SynthesisPipeline {
    fn default() -> Self {
        Self::new(&SynthesisConfig::default())
    }
}

impl SynthesisPipeline {
    pub fn new(config: &SynthesisConfig) -> Self {
        Self {
            scorer: SimilarityScorer::from_config(config),
            synthesizer: ArticleSynthesizer::from_config(config),
            threshold: config.cluster_threshold,
        }
    }

    /// Runs clustering and synthesis over `articles`.
    ///
    /// Each cluster becomes one synthesized entry, appended in discovery order. Every
    /// input position not consumed by a cluster is then passed through, in input order,
    /// marked as `original` with a single source. Articles sharing a title are tracked
    /// separately, so each input lands in exactly one output entry.
    pub fn synthesize_articles(&self, articles: &[RawArticle]) -> SynthesisReport {
        info!(target: TARGET_SYNTHESIS, "Analyzing {} articles", articles.len());

        let partition = find_similar_articles(articles, &self.scorer, self.threshold);
        info!(
            target: TARGET_SYNTHESIS,
            "Found {} groups of similar articles",
            partition.clusters.len()
        );

        let mut output: Vec<OutputArticle> = Vec::with_capacity(articles.len());
        // Indexed by input position; titles are not unique enough to key on
        let mut consumed = vec![false; articles.len()];

        for (n, cluster) in partition.clusters().iter().enumerate() {
            let members = cluster.articles(articles);
            info!(
                target: TARGET_SYNTHESIS,
                "Synthesizing group {}: {} articles",
                n + 1,
                members.len()
            );

            if let Some(merged) = self.synthesizer.synthesize(&members) {
                output.push(OutputArticle::Synthesized(merged));
                for &idx in &cluster.members {
                    consumed[idx] = true;
                }
            }
        }

        for (idx, article) in articles.iter().enumerate() {
            if consumed[idx] {
                continue;
            }
            debug!(
                target: TARGET_SYNTHESIS,
                "Passing through '{}' ({})",
                article.title,
                article.title_hash()
            );
            output.push(OutputArticle::Original(PassthroughArticle::from(article)));
        }

        let stats = SynthesisStats::new(articles.len(), partition.clusters.len(), output.len());
        info!(
            target: TARGET_SYNTHESIS,
            "Synthesis complete: {} in, {} out, compression ratio {:.2}",
            stats.total_input,
            stats.synthesized,
            stats.compression_ratio
        );

        SynthesisReport {
            articles: output,
            stats,
        }
    }
}

/// Runs the pipeline with default heuristics.
pub fn synthesize_articles(articles: &[RawArticle]) -> (Vec<OutputArticle>, SynthesisStats) {
    SynthesisPipeline::default()
        .synthesize_articles(articles)
        .into_parts()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::SynthesisMethod;

    #[test]
    fn test_empty_input() {
        let (articles, stats) = synthesize_articles(&[]);
        assert!(articles.is_empty());
        assert_eq!(stats.total_input, 0);
        assert_eq!(stats.groups_found, 0);
        assert_eq!(stats.synthesized, 0);
        assert_eq!(stats.compression_ratio, 0.0);
    }

    #[test]
    fn test_no_clusters_passes_everything_through() {
        let input = vec![
            RawArticle::new("Sube el precio del maíz", "uno", "A"),
            RawArticle::new("Selección nacional gana torneo", "dos", "B"),
        ];
        let (articles, stats) = synthesize_articles(&input);

        assert_eq!(articles.len(), 2);
        assert!(articles
            .iter()
            .all(|a| a.synthesis_method() == SynthesisMethod::Original && a.sources_count() == 1));
        assert_eq!(articles[0].title(), "Sube el precio del maíz");
        assert_eq!(stats.compression_ratio, 1.0);
    }

    #[test]
    fn test_cluster_replaces_members() {
        let input = vec![
            RawArticle::new("Banco central sube tasas de interés", "corta", "A"),
            RawArticle::new("Selección nacional gana torneo", "dos", "B"),
            RawArticle::new("Banco central sube tasas de interés", "descripción larga", "C"),
        ];
        let (articles, stats) = synthesize_articles(&input);

        assert_eq!(stats.groups_found, 1);
        assert_eq!(stats.synthesized, 2);
        assert!((stats.compression_ratio - 2.0 / 3.0).abs() < 1e-9);

        assert_eq!(articles[0].synthesis_method(), SynthesisMethod::Synthesized);
        assert_eq!(articles[0].sources_count(), 2);
        assert_eq!(articles[0].description(), "descripción larga");
        assert_eq!(articles[1].title(), "Selección nacional gana torneo");
        assert_eq!(articles[1].synthesis_method(), SynthesisMethod::Original);
    }

    #[test]
    fn test_rerun_is_identical() {
        let input = vec![
            RawArticle::new("Banco central sube tasas de interés", "El alza fue de 25 puntos en 2026, un 4% anual.", "A"),
            RawArticle::new("Banco central sube tasas de interés hoy", "La tasa llegó a 11% en 2026 según el banco.", "B"),
            RawArticle::new("Lluvias en la capital", "Sin datos.", "C"),
        ];
        let pipeline = SynthesisPipeline::default();
        assert_eq!(
            pipeline.synthesize_articles(&input),
            pipeline.synthesize_articles(&input)
        );
    }
}
