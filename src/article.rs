//! Article records flowing into and out of the synthesis pipeline.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Label used when a feed item carries no outlet name.
pub const UNKNOWN_SOURCE: &str = "Desconocido";

/// Number of hex digits kept from the title hash.
const TITLE_HASH_LEN: usize = 10;

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

/// A news item as delivered by the fetchers. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default = "unknown_source")]
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RawArticle {
    pub fn new(title: &str, description: &str, source_name: &str) -> Self {
        RawArticle {
            title: title.to_string(),
            description: description.to_string(),
            content: None,
            source_name: source_name.to_string(),
            published_at: None,
            url: None,
            image_url: None,
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_published_at(mut self, published_at: &str) -> Self {
        self.published_at = Some(published_at.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_image_url(mut self, image_url: &str) -> Self {
        self.image_url = Some(image_url.to_string());
        self
    }

    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Description and content joined by a single space, the text facts are mined from.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.description, self.content_or_empty())
    }

    /// Short content hash of the title, used to track which inputs a cluster consumed.
    pub fn title_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..TITLE_HASH_LEN].to_string()
    }
}

/// How an output entry was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMethod {
    Synthesized,
    Original,
}

impl fmt::Display for SynthesisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisMethod::Synthesized => write!(f, "synthesized"),
            SynthesisMethod::Original => write!(f, "original"),
        }
    }
}

/// Reference to one of the articles merged into a synthesized entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub source: String,
}

impl From<&RawArticle> for SourceRef {
    fn from(article: &RawArticle) -> Self {
        SourceRef {
            title: article.title.clone(),
            source: article.source_name.clone(),
        }
    }
}

/// One canonical article built from a cluster of near-duplicate reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedArticle {
    pub title: String,
    // Base description plus any supplementary facts
    pub description: String,
    pub content: String,
    pub url: String,
    pub image_url: String,
    pub published_at: String,

    // Provenance
    pub sources_count: usize,
    pub source_names: Vec<String>,
    pub synthesis_method: SynthesisMethod,
    pub facts_extracted: usize,
    pub original_articles: Vec<SourceRef>,
}

/// An input article that matched no cluster, passed through with provenance markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassthroughArticle {
    #[serde(flatten)]
    pub article: RawArticle,
    pub synthesis_method: SynthesisMethod,
    pub sources_count: usize,
}

impl From<&RawArticle> for PassthroughArticle {
    fn from(article: &RawArticle) -> Self {
        PassthroughArticle {
            article: article.clone(),
            synthesis_method: SynthesisMethod::Original,
            sources_count: 1,
        }
    }
}

/// Entry of the pipeline output: either a merged article or an untouched singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputArticle {
    Synthesized(SynthesizedArticle),
    Original(PassthroughArticle),
}

impl OutputArticle {
    pub fn title(&self) -> &str {
        match self {
            OutputArticle::Synthesized(a) => &a.title,
            OutputArticle::Original(a) => &a.article.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            OutputArticle::Synthesized(a) => &a.description,
            OutputArticle::Original(a) => &a.article.description,
        }
    }

    pub fn synthesis_method(&self) -> SynthesisMethod {
        match self {
            OutputArticle::Synthesized(a) => a.synthesis_method,
            OutputArticle::Original(a) => a.synthesis_method,
        }
    }

    pub fn sources_count(&self) -> usize {
        match self {
            OutputArticle::Synthesized(a) => a.sources_count,
            OutputArticle::Original(a) => a.sources_count,
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        match self {
            OutputArticle::Synthesized(a) => a.source_names.iter().map(String::as_str).collect(),
            OutputArticle::Original(a) => vec![a.article.source_name.as_str()],
        }
    }
}
