use std::collections::HashSet;
use tracing::{debug, info};

use super::types::{Assignment, Cluster, Partition};
use super::MIN_CLUSTER_SIZE;
use crate::article::RawArticle;
use crate::config::SynthesisConfig;
use crate::similarity::SimilarityScorer;
use crate::TARGET_CLUSTERING;

/// Partitions `articles` into groups of near-duplicate reports.
///
/// Greedy single pass over the input:
/// 1. Each still-unassigned article seeds a candidate group
/// 2. Every later unassigned article scoring at least `threshold` against the seed joins it
/// 3. Groups of at least two articles become clusters; a lone seed stays unclustered
///
/// Articles are only compared with the seed, never with other members, so a
/// chain A~B~C does not pull C in unless it also matches A.
///
/// # Arguments
/// * `articles` - Input batch, in the order it should be scanned
/// * `scorer` - Pairwise scorer
/// * `threshold` - Minimum combined score to join a group
///
/// # Returns
/// * `Partition` - One assignment per input plus the clusters in discovery order
pub fn find_similar_articles(
    articles: &[RawArticle],
    scorer: &SimilarityScorer,
    threshold: f64,
) -> Partition {
    let keyword_sets: Vec<HashSet<String>> =
        articles.iter().map(|a| scorer.keywords_for(a)).collect();

    let mut assignments = vec![Assignment::Unclustered; articles.len()];
    // Seeds that found no partner are done but stay unclustered
    let mut visited = vec![false; articles.len()];
    let mut clusters: Vec<Cluster> = Vec::new();

    for i in 0..articles.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut members = vec![i];

        for j in (i + 1)..articles.len() {
            if visited[j] {
                continue;
            }
            let score = scorer.score_with_keywords(
                &articles[i],
                &keyword_sets[i],
                &articles[j],
                &keyword_sets[j],
            );
            debug!(
                target: TARGET_CLUSTERING,
                "Score {:.3} between '{}' and '{}'", score, articles[i].title, articles[j].title
            );
            if score >= threshold {
                members.push(j);
                visited[j] = true;
            }
        }

        if members.len() >= MIN_CLUSTER_SIZE {
            let id = clusters.len();
            for &idx in &members {
                assignments[idx] = Assignment::Clustered(id);
            }
            debug!(
                target: TARGET_CLUSTERING,
                "Cluster {} seeded by '{}' with {} articles", id, articles[i].title, members.len()
            );
            clusters.push(Cluster { id, members });
        }
    }

    info!(
        target: TARGET_CLUSTERING,
        "Found {} clusters among {} articles (threshold {:.2})",
        clusters.len(),
        articles.len(),
        threshold
    );

    Partition {
        assignments,
        clusters,
    }
}

/// Clusters `articles` with the scorer and threshold from `config`.
pub fn cluster_articles(articles: &[RawArticle], config: &SynthesisConfig) -> Partition {
    let scorer = SimilarityScorer::from_config(config);
    find_similar_articles(articles, &scorer, config.cluster_threshold)
}
