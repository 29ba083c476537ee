use crate::config::DEFAULT_FACT_DEDUP_THRESHOLD;
use crate::similarity::similarity;

/// Drops facts that restate an earlier one.
#[derive(Debug, Clone)]
pub struct FactDeduplicator {
    threshold: f64,
}

impl Default for FactDeduplicator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FACT_DEDUP_THRESHOLD,
        }
    }
}

impl FactDeduplicator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Keeps each fact whose similarity to every fact already kept is at most the
    /// threshold. Input order is priority order, so the earlier of two near-duplicates wins.
    pub fn dedup<I>(&self, facts: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for fact in facts {
            let is_duplicate = unique
                .iter()
                .any(|existing| similarity(&fact, existing) > self.threshold);
            if !is_duplicate {
                unique.push(fact);
            }
        }
        unique
    }
}
