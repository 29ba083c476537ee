//! String and keyword-set similarity measures used for clustering and fact dedup.

use std::collections::{HashMap, HashSet};
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::article::RawArticle;
use crate::config::{KeywordScope, SynthesisConfig, TitleMetric};
use crate::keywords::KeywordExtractor;

/// Sequences at least this long get their most frequent elements ignored as anchors
const AUTOJUNK_MIN_LEN: usize = 200;

/// Ratcliff/Obershelp matcher over two character sequences.
///
/// Mirrors the classic "longest matching blocks" algorithm: find the longest common
/// block, recurse on both sides, and score `2 * matched / total`. Elements of `b`
/// that occur in more than 1% of a long sequence are not used as match anchors.
struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, idxs| idxs.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = match j.checked_sub(1) {
                        Some(jm1) => j2len.get(&jm1).copied().unwrap_or(0),
                        None => 0,
                    };
                    let k = prev + 1;
                    new_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Grow the block across elements dropped from the index
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    fn matched_len(&self) -> usize {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_len() as f64 / total as f64
    }
}

/// Case-insensitive character similarity of two strings in `[0, 1]`.
///
/// Two empty strings are identical (`1.0`); one empty string scores `0.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

/// Case-insensitive similarity of two titles under the chosen metric.
pub fn title_similarity(a: &str, b: &str, metric: TitleMetric) -> f64 {
    match metric {
        TitleMetric::SequenceRatio => similarity(a, b),
        TitleMetric::JaroWinkler => jaro_winkler(&a.to_lowercase(), &b.to_lowercase()),
        TitleMetric::NormalizedLevenshtein => {
            normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
        }
    }
}

/// Jaccard index of two keyword sets; an empty union scores `0.0`.
pub fn keyword_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union.max(1) as f64
}

/// Scores how likely two articles are to report the same event.
pub struct SimilarityScorer {
    extractor: KeywordExtractor,
    scope: KeywordScope,
    metric: TitleMetric,
    keyword_weight: f64,
    title_weight: f64,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::from_config(&SynthesisConfig::default())
    }
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self {
            extractor: KeywordExtractor::new()
                .with_top_n(config.keyword_top_n)
                .with_stemming(config.stem_keywords),
            scope: config.keyword_scope,
            metric: config.title_metric,
            keyword_weight: config.keyword_weight,
            title_weight: config.title_weight,
        }
    }

    /// Keyword set an article contributes to comparisons.
    pub fn keywords_for(&self, article: &RawArticle) -> HashSet<String> {
        match self.scope {
            KeywordScope::Title => self.extractor.keyword_set(&article.title),
            KeywordScope::TitleAndDescription => self
                .extractor
                .keyword_set(&format!("{} {}", article.title, article.description)),
        }
    }

    /// Weighted blend of keyword overlap and raw title similarity.
    pub fn combine(&self, keyword_sim: f64, title_sim: f64) -> f64 {
        keyword_sim * self.keyword_weight + title_sim * self.title_weight
    }

    /// Combined score using precomputed keyword sets.
    pub fn score_with_keywords(
        &self,
        a: &RawArticle,
        a_keywords: &HashSet<String>,
        b: &RawArticle,
        b_keywords: &HashSet<String>,
    ) -> f64 {
        let keyword_sim = keyword_similarity(a_keywords, b_keywords);
        let title_sim = title_similarity(&a.title, &b.title, self.metric);
        self.combine(keyword_sim, title_sim)
    }

    pub fn score(&self, a: &RawArticle, b: &RawArticle) -> f64 {
        self.score_with_keywords(a, &self.keywords_for(a), b, &self.keywords_for(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_reflexive() {
        assert_eq!(similarity("México anuncia plan", "México anuncia plan"), 1.0);
        assert_eq!(similarity("a", "a"), 1.0);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "algo"), 0.0);
        assert_eq!(similarity("algo", ""), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(similarity("GOBIERNO", "gobierno"), 1.0);
    }

    #[test]
    fn test_known_ratios() {
        assert!((similarity("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!((similarity("abc", "xyz") - 0.0).abs() < 1e-9);
        // "gobierno " + "a plan" + "an" = 17 matched of 40
        assert!((similarity("Gobierno anuncia plan", "Gobierno lanza plan") - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_on_common_cases() {
        let pairs = [
            ("abcd", "bcde"),
            ("Gobierno anuncia plan", "Gobierno lanza plan"),
            ("inflación", "inflación anual"),
        ];
        for (a, b) in pairs {
            assert!((similarity(a, b) - similarity(b, a)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bounded() {
        let texts = ["", "a", "plan económico", "económico plan", "zzzz"];
        for a in texts {
            for b in texts {
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s), "{} vs {} = {}", a, b, s);
            }
        }
    }

    #[test]
    fn test_long_text_autojunk_still_reflexive() {
        let text = "a".repeat(150) + &"b".repeat(150);
        assert_eq!(similarity(&text, &text), 1.0);
    }

    #[test]
    fn test_keyword_similarity() {
        assert_eq!(keyword_similarity(&set(&[]), &set(&[])), 0.0);
        assert_eq!(keyword_similarity(&set(&["plan"]), &set(&["plan"])), 1.0);
        assert!((keyword_similarity(&set(&["plan", "fiscal"]), &set(&["plan", "gasto"])) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_alternate_metrics_reflexive() {
        for metric in [TitleMetric::JaroWinkler, TitleMetric::NormalizedLevenshtein] {
            assert!((title_similarity("Plan Fiscal", "plan fiscal", metric) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_combined_score_of_identical_titles() {
        let scorer = SimilarityScorer::new();
        let a = RawArticle::new("Banco central sube tasas de interés", "", "A");
        let b = RawArticle::new("Banco central sube tasas de interés", "", "B");
        assert!((scorer.score(&a, &b) - 1.0).abs() < 1e-9);
    }
}
