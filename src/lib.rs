pub mod article;
pub mod clustering;
pub mod config;
pub mod facts;
pub mod keywords;
pub mod logging;
pub mod similarity;
pub mod synthesis;

pub use article::{
    OutputArticle, PassthroughArticle, RawArticle, SourceRef, SynthesisMethod, SynthesizedArticle,
};
pub use config::{KeywordScope, SynthesisConfig, TitleMetric};
pub use synthesis::{SynthesisPipeline, SynthesisReport, SynthesisStats};

pub const TARGET_CLUSTERING: &str = "clustering";
pub const TARGET_SYNTHESIS: &str = "synthesis";
pub const TARGET_CONFIG: &str = "config";
