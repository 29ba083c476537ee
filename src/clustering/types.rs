use serde::Serialize;

use crate::article::RawArticle;

/// Where an input article ended up after clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Assignment {
    Clustered(usize),
    Unclustered,
}

/// A group of two or more input articles judged to cover the same event.
///
/// Members are indices into the input slice, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Borrows the member articles from the input they were built from.
    /// Indices past the end of `articles` are skipped.
    pub fn articles<'a>(&self, articles: &'a [RawArticle]) -> Vec<&'a RawArticle> {
        self.members.iter().filter_map(|&idx| articles.get(idx)).collect()
    }
}

/// Result of clustering a batch: one assignment per input plus the clusters found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    pub assignments: Vec<Assignment>,
    pub clusters: Vec<Cluster>,
}

impl Partition {
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn assignment(&self, idx: usize) -> Option<Assignment> {
        self.assignments.get(idx).copied()
    }

    /// Input indices not claimed by any cluster, in input order.
    pub fn unclustered(&self) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == Assignment::Unclustered)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn clustered_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Member articles of every cluster, in discovery order.
    pub fn clusters_of<'a>(&self, articles: &'a [RawArticle]) -> Vec<Vec<&'a RawArticle>> {
        self.clusters.iter().map(|c| c.articles(articles)).collect()
    }
}
